use crate::serde_null::null_as_empty;
use crate::Error;

/// A poll ("scrutin"), stored under its own name.
///
/// `description` and `user` are stored lowercased. `votes` holds a snapshot of
/// each vote option as it was when registered; live counts live under the
/// option's own key (see [`Tally`](crate::Tally)).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Poll {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub user: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub votes: Vec<VoteOption>,
}

impl Poll {
    /// Create a new poll with no vote options
    pub fn new(name: &str, description: &str, user: &str) -> Self {
        Poll {
            name: name.to_owned(),
            description: description.to_lowercase(),
            user: user.to_lowercase(),
            votes: vec![],
        }
    }

    /// Get a registered vote option by name
    pub fn get_vote(&self, name: &str) -> Option<&VoteOption> {
        self.votes.iter().find(|vote| vote.name == name)
    }

    /// Names of the registered vote options, in registration order
    pub fn vote_names(&self) -> impl Iterator<Item = &str> {
        self.votes.iter().map(|vote| vote.name.as_str())
    }
}

/// A vote option, stored under its own name (unique across all polls).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteOption {
    #[serde(default)]
    pub name: String,

    /// Every user who voted for this option, in casting order. Not deduplicated.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: Vec<String>,

    /// Creation time, in milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: i64,

    #[serde(default)]
    pub count: i64,
}

impl VoteOption {
    pub fn new(name: &str, timestamp: i64) -> Self {
        VoteOption {
            name: name.to_owned(),
            users: vec![],
            timestamp,
            count: 0,
        }
    }

    /// Record a vote by `user`.
    ///
    /// A user may vote any number of times; each vote is counted.
    /// Fails without recording anything if `count` is already at its maximum.
    pub fn cast(&mut self, user: &str) -> Result<(), Error> {
        let count = self.count.checked_add(1).ok_or_else(|| {
            Error::InvalidArgument(format!("vote {} count overflows", self.name))
        })?;
        self.users.push(user.to_owned());
        self.count = count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_lowercases() {
        let poll = Poll::new("Scrutin", "Best COLOR", "Alice");
        assert_eq!(poll.name, "Scrutin");
        assert_eq!(poll.description, "best color");
        assert_eq!(poll.user, "alice");
        assert!(poll.votes.is_empty());
    }

    #[test]
    fn test_field_order() {
        let poll = Poll::new("p1", "d", "u");
        assert_eq!(
            serde_json::to_string(&poll).unwrap(),
            r#"{"name":"p1","description":"d","user":"u","votes":[]}"#
        );

        let mut vote = VoteOption::new("optA", 1_500_000_000_000);
        vote.cast("alice").unwrap();
        assert_eq!(
            serde_json::to_string(&vote).unwrap(),
            r#"{"name":"optA","users":["alice"],"timestamp":1500000000000,"count":1}"#
        );
    }

    #[test]
    fn test_legacy_null_arrays() {
        let poll: Poll =
            serde_json::from_str(r#"{"name":"p1","description":"d","user":"u","votes":null}"#)
                .unwrap();
        assert!(poll.votes.is_empty());

        let vote: VoteOption =
            serde_json::from_str(r#"{"name":"optA","users":null,"timestamp":7,"count":0}"#)
                .unwrap();
        assert!(vote.users.is_empty());
        assert_eq!(vote.timestamp, 7);
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        // A vote option record read as a poll still yields its name
        let poll: Poll =
            serde_json::from_str(r#"{"name":"optA","users":[],"timestamp":7,"count":0}"#).unwrap();
        assert_eq!(poll.name, "optA");
        assert!(poll.votes.is_empty());

        let vote: VoteOption = serde_json::from_str("{}").unwrap();
        assert_eq!(vote, VoteOption::default());
    }

    #[test]
    fn test_cast_does_not_dedup() {
        let mut vote = VoteOption::new("optA", 1);
        vote.cast("alice").unwrap();
        vote.cast("alice").unwrap();
        assert_eq!(vote.users, vec!["alice", "alice"]);
        assert_eq!(vote.count, 2);
    }

    #[test]
    fn test_cast_overflow() {
        let mut vote = VoteOption::new("optA", 1);
        vote.count = i64::MAX;
        assert!(matches!(vote.cast("alice"), Err(Error::InvalidArgument(_))));
        assert_eq!(vote.count, i64::MAX);
        assert!(vote.users.is_empty());
    }

    #[test]
    fn test_negative_count_decodes() {
        let vote: VoteOption =
            serde_json::from_str(r#"{"name":"optA","users":[],"timestamp":7,"count":-1}"#)
                .unwrap();
        assert_eq!(vote.count, -1);
    }
}
