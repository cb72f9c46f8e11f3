use crate::*;

/// Live results for one vote option
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TallyResult {
    pub name: String,
    pub count: i64,
    pub users: Vec<String>,
}

/// Live results for every option attached to a poll, in registration order.
///
/// The options embedded in a [`Poll`] are snapshots taken at registration, so
/// each option is re-read from its own key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub name: String,
    pub results: Vec<TallyResult>,
}

impl Tally {
    pub fn count<S: Store>(store: &S, poll: &Poll) -> Result<Self, Error> {
        let mut results = Vec::with_capacity(poll.votes.len());
        for name in poll.vote_names() {
            let vote: Option<VoteOption> = store.get_record(name)?;
            let result = match vote {
                Some(vote) if vote.name == name => TallyResult {
                    name: vote.name,
                    count: vote.count,
                    users: vote.users,
                },
                _ => TallyResult {
                    name: name.to_owned(),
                    count: 0,
                    users: vec![],
                },
            };
            results.push(result);
        }

        Ok(Tally {
            name: poll.name.clone(),
            results,
        })
    }

    /// Total number of votes cast across all options, saturating at the `i64` bounds
    pub fn total(&self) -> i64 {
        self.results
            .iter()
            .fold(0i64, |total, r| total.saturating_add(r.count))
    }

    /// The option(s) with the most votes. Empty when no option has a vote.
    pub fn leaders(&self) -> Vec<&str> {
        let max = self.results.iter().map(|r| r.count).max().unwrap_or(0);
        if max <= 0 {
            return vec![];
        }
        self.results
            .iter()
            .filter(|r| r.count == max)
            .map(|r| r.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_with(store: &mut MemStore, options: &[(&str, &[&str])]) -> Poll {
        let mut poll = Poll::new("p1", "d", "u");
        for (name, users) in options {
            let mut vote = VoteOption::new(name, 1);
            poll.votes.push(vote.clone());
            for user in users.iter() {
                vote.cast(user).unwrap();
            }
            store.put_record(name, &vote).unwrap();
        }
        poll
    }

    #[test]
    fn test_tally_reads_live_options() {
        let mut store = MemStore::new();
        let poll = poll_with(&mut store, &[("red", &["a", "b"]), ("blue", &["c"])]);

        let tally = Tally::count(&store, &poll).unwrap();
        assert_eq!(tally.name, "p1");
        assert_eq!(tally.results[0].name, "red");
        assert_eq!(tally.results[0].count, 2);
        assert_eq!(tally.results[1].users, vec!["c"]);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.leaders(), vec!["red"]);
    }

    #[test]
    fn test_tally_missing_option_counts_zero() {
        let mut store = MemStore::new();
        let poll = poll_with(&mut store, &[("red", &["a"])]);
        store.put_state("red", b"garbage".to_vec()).unwrap();

        let tally = Tally::count(&store, &poll).unwrap();
        assert_eq!(tally.results[0].count, 0);
        assert!(tally.leaders().is_empty());
    }

    #[test]
    fn test_tally_ties() {
        let mut store = MemStore::new();
        let poll = poll_with(&mut store, &[("red", &["a"]), ("blue", &["b"]), ("green", &[])]);

        let tally = Tally::count(&store, &poll).unwrap();
        assert_eq!(tally.leaders(), vec!["red", "blue"]);
    }

    #[test]
    fn test_tally_total_saturates() {
        let tally = Tally {
            name: "p1".into(),
            results: vec![
                TallyResult {
                    name: "red".into(),
                    count: i64::MAX,
                    users: vec![],
                },
                TallyResult {
                    name: "blue".into(),
                    count: 1,
                    users: vec![],
                },
            ],
        };
        assert_eq!(tally.total(), i64::MAX);
        assert_eq!(tally.leaders(), vec!["red"]);
    }
}
