use crate::serde_null::null_as_empty;

/// Key of the poll index: every poll name, in creation order
pub const POLL_INDEX_KEY: &str = "_scrutinindex";

/// Key of the open-poll log
pub const OPEN_POLLS_KEY: &str = "_openscrutins";

/// Key of the counter written by a reset
pub const RESET_COUNTER_KEY: &str = "abc";

/// Key holding a copy of the most recent open-poll entry
pub const LAST_OPEN_POLL_KEY: &str = "_debug1";

/// Ordered, append-only list of poll names.
///
/// Appending rewrites the whole list, so each append costs O(n) in the number of polls.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct PollIndex(#[serde(deserialize_with = "null_as_empty")] pub Vec<String>);

impl PollIndex {
    pub fn push(&mut self, name: &str) {
        self.0.push(name.to_owned());
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

/// One "open poll" event
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenPollEntry {
    #[serde(default)]
    pub name: String,

    /// User who opened the poll
    #[serde(default)]
    pub user: String,

    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: i64,
}

/// Append-only audit log of "open poll" events
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenPollLog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub open_scrutins: Vec<OpenPollEntry>,
}

impl OpenPollLog {
    pub fn push(&mut self, entry: OpenPollEntry) {
        self.open_scrutins.push(entry);
    }

    pub fn entries(&self) -> &[OpenPollEntry] {
        &self.open_scrutins
    }
}
