use crate::*;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Every function the host can call, by wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Reset the counter and both index singletons
    Init,
    /// Store a raw value under any key
    Write,
    /// Create a poll
    InitScrutin,
    /// Append to the open-poll log
    OpenScrutin,
    /// Register a vote option, attaching it to a poll
    InitVote,
    /// Cast a vote for an option
    AddVote,
    /// Read raw bytes at a key
    Read,
    /// Read the open-poll log
    ReadOpenScrutins,
    /// Live vote counts for a poll
    Tally,
}

impl Function {
    pub const ALL: [Function; 9] = [
        Function::Init,
        Function::Write,
        Function::InitScrutin,
        Function::OpenScrutin,
        Function::InitVote,
        Function::AddVote,
        Function::Read,
        Function::ReadOpenScrutins,
        Function::Tally,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Init => "init",
            Function::Write => "write",
            Function::InitScrutin => "init_scrutin",
            Function::OpenScrutin => "open_scrutin",
            Function::InitVote => "init_vote",
            Function::AddVote => "add_vote",
            Function::Read => "read",
            Function::ReadOpenScrutins => "read_open_scrutins",
            Function::Tally => "tally",
        }
    }

    /// Whether the function is served by the read-only channel
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Function::Read | Function::ReadOpenScrutins | Function::Tally
        )
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Function {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::ALL
            .iter()
            .find(|function| function.name() == s)
            .copied()
            .ok_or_else(|| Error::UnknownFunction(s.to_owned()))
    }
}

/// Entities that are stored under their own name
trait Named: DeserializeOwned {
    const KIND: &'static str;

    fn name(&self) -> &str;
}

impl Named for Poll {
    const KIND: &'static str = "scrutin";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for VoteOption {
    const KIND: &'static str = "vote";

    fn name(&self) -> &str {
        &self.name
    }
}

/// What currently sits at a key we are about to create a record under
enum Slot {
    Vacant,
    /// A record of the expected kind with the expected name
    Taken,
    /// Bytes that are not a record of the expected kind with this name
    Occupied,
}

/// The poll chaincode.
///
/// Holds no entity state of its own: every call re-reads, mutates and re-writes
/// the keys it needs through the supplied [`Store`].
#[derive(Debug, Clone, Default)]
pub struct Chaincode<C: Clock = SystemClock> {
    config: Config,
    clock: C,
}

impl Chaincode<SystemClock> {
    pub fn new(config: Config) -> Self {
        Chaincode {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Chaincode<C> {
    pub fn with_clock(config: Config, clock: C) -> Self {
        Chaincode { config, clock }
    }

    /// Deploy-time entry point. Resets the chaincode state.
    pub fn init<S, A>(&self, store: &mut S, args: &[A]) -> Result<Vec<u8>, Error>
    where
        S: Store,
        A: AsRef<str>,
    {
        expect_args(Function::Init, args, 1)?;
        let value: i64 = args[0].as_ref().parse().map_err(|_| {
            Error::InvalidArgument(format!(
                "expecting integer value for init, got {:?}",
                args[0].as_ref()
            ))
        })?;
        self.reset(store, value)?;
        Ok(vec![])
    }

    /// Legacy entry point, equivalent to [`invoke`](Chaincode::invoke)
    pub fn run<S, A>(&self, store: &mut S, function: &str, args: &[A]) -> Result<Vec<u8>, Error>
    where
        S: Store,
        A: AsRef<str>,
    {
        debug!(function, "run is running");
        self.invoke(store, function, args)
    }

    /// Mutating channel
    pub fn invoke<S, A>(&self, store: &mut S, function: &str, args: &[A]) -> Result<Vec<u8>, Error>
    where
        S: Store,
        A: AsRef<str>,
    {
        debug!(function, "invoke is running");
        let function: Function = function.parse()?;
        match function {
            Function::Init => self.init(store, args),
            Function::Write => {
                expect_args(function, args, 2)?;
                self.write(store, args[0].as_ref(), args[1].as_ref())?;
                Ok(vec![])
            }
            Function::InitScrutin => {
                expect_args(function, args, 3)?;
                self.create_poll(
                    store,
                    args[0].as_ref(),
                    args[1].as_ref(),
                    args[2].as_ref(),
                )?;
                Ok(vec![])
            }
            Function::OpenScrutin => {
                expect_args(function, args, 2)?;
                self.log_open_poll(store, args[0].as_ref(), args[1].as_ref())?;
                Ok(vec![])
            }
            Function::InitVote => {
                expect_args(function, args, 2)?;
                self.register_vote_option(store, args[0].as_ref(), args[1].as_ref())?;
                Ok(vec![])
            }
            Function::AddVote => {
                expect_args(function, args, 2)?;
                self.cast_vote(store, args[0].as_ref(), args[1].as_ref())?;
                Ok(vec![])
            }
            _ => {
                warn!(%function, "invoke did not find func");
                Err(Error::UnknownFunction(function.name().to_owned()))
            }
        }
    }

    /// Read-only channel
    pub fn query<S, A>(&self, store: &S, function: &str, args: &[A]) -> Result<Vec<u8>, Error>
    where
        S: Store,
        A: AsRef<str>,
    {
        debug!(function, "query is running");
        let function: Function = function.parse()?;
        match function {
            Function::Read => {
                expect_args(function, args, 1)?;
                self.read(store, args[0].as_ref())
            }
            Function::ReadOpenScrutins => {
                expect_args(function, args, 0)?;
                self.read_open_polls(store)
            }
            Function::Tally => {
                expect_args(function, args, 1)?;
                let tally = self.tally(store, args[0].as_ref())?;
                Ok(serde_json::to_vec(&tally)?)
            }
            _ => {
                warn!(%function, "query did not find func");
                Err(Error::UnknownFunction(function.name().to_owned()))
            }
        }
    }

    /// Write the reset counter and empty both the poll index and the open-poll log.
    ///
    /// Polls and vote options already stored are left in place.
    pub fn reset<S: Store>(&self, store: &mut S, value: i64) -> Result<(), Error> {
        store.put_state(RESET_COUNTER_KEY, value.to_string().into_bytes())?;
        store.put_record(POLL_INDEX_KEY, &PollIndex::default())?;
        store.put_record(OPEN_POLLS_KEY, &OpenPollLog::default())?;
        info!(value, "state reset");
        Ok(())
    }

    /// Store `value` verbatim under `name`. Both must be non-empty.
    pub fn write<S: Store>(&self, store: &mut S, name: &str, value: &str) -> Result<(), Error> {
        non_empty(1, name)?;
        non_empty(2, value)?;
        store.put_state(name, value.as_bytes().to_vec())?;
        Ok(())
    }

    /// Raw bytes at `name`; empty if never written
    pub fn read<S: Store>(&self, store: &S, name: &str) -> Result<Vec<u8>, Error> {
        Ok(store.get_state(name)?.unwrap_or_default())
    }

    /// Raw bytes of the open-poll log
    pub fn read_open_polls<S: Store>(&self, store: &S) -> Result<Vec<u8>, Error> {
        self.read(store, OPEN_POLLS_KEY)
    }

    pub fn create_poll<S: Store>(
        &self,
        store: &mut S,
        name: &str,
        description: &str,
        user: &str,
    ) -> Result<(), Error> {
        non_empty(1, name)?;
        non_empty(2, description)?;
        non_empty(3, user)?;

        self.claim::<Poll, S>(store, name)?;

        let poll = Poll::new(name, description, user);
        store.put_record(name, &poll)?;

        let mut index = self.poll_index(store)?;
        index.push(name);
        store.put_record(POLL_INDEX_KEY, &index)?;

        info!(scrutin = name, "scrutin created");
        Ok(())
    }

    pub fn register_vote_option<S: Store>(
        &self,
        store: &mut S,
        poll_name: &str,
        option_name: &str,
    ) -> Result<(), Error> {
        non_empty(1, poll_name)?;
        non_empty(2, option_name)?;

        self.claim::<VoteOption, S>(store, option_name)?;

        if self.config.mode == Mode::Strict && self.poll(store, poll_name)?.is_none() {
            return Err(Error::NotFound(format!("scrutin {}", poll_name)));
        }

        let vote = VoteOption::new(option_name, self.clock.now_millis());
        store.put_record(option_name, &vote)?;
        info!(vote = option_name, "vote option added");

        // Read the poll after the option is stored, so a poll sharing the
        // option's key observes the option that just replaced it.
        match self.poll(store, poll_name)? {
            Some(mut poll) => {
                poll.votes.push(vote);
                store.put_record(poll_name, &poll)?;
                info!(scrutin = poll_name, vote = option_name, "scrutin updated");
            }
            None => {
                warn!(
                    scrutin = poll_name,
                    vote = option_name,
                    "scrutin not found, vote option left unattached"
                );
            }
        }
        Ok(())
    }

    pub fn cast_vote<S: Store>(
        &self,
        store: &mut S,
        option_name: &str,
        user: &str,
    ) -> Result<(), Error> {
        non_empty(1, option_name)?;
        non_empty(2, user)?;

        match self.vote_option(store, option_name)? {
            Some(mut vote) => {
                vote.cast(user)?;
                store.put_record(option_name, &vote)?;
                info!(vote = option_name, count = vote.count, "vote updated");
                Ok(())
            }
            None if self.config.mode == Mode::Strict => {
                Err(Error::NotFound(format!("vote {}", option_name)))
            }
            None => {
                warn!(vote = option_name, user, "vote not found, nothing counted");
                Ok(())
            }
        }
    }

    pub fn log_open_poll<S: Store>(&self, store: &mut S, name: &str, user: &str) -> Result<(), Error> {
        non_empty(1, name)?;
        non_empty(2, user)?;

        let entry = OpenPollEntry {
            name: name.to_owned(),
            user: user.to_owned(),
            timestamp: self.clock.now_millis(),
        };
        store.put_record(LAST_OPEN_POLL_KEY, &entry)?;

        let mut log = self.open_polls(store)?;
        log.push(entry);
        store.put_record(OPEN_POLLS_KEY, &log)?;

        info!(scrutin = name, user, "scrutin opened");
        Ok(())
    }

    /// Live vote counts for every option attached to a poll
    pub fn tally<S: Store>(&self, store: &S, poll_name: &str) -> Result<Tally, Error> {
        non_empty(1, poll_name)?;
        let poll = self
            .poll(store, poll_name)?
            .ok_or_else(|| Error::NotFound(format!("scrutin {}", poll_name)))?;
        Tally::count(store, &poll)
    }

    /// The poll stored under `name`, if there is one
    pub fn poll<S: Store>(&self, store: &S, name: &str) -> Result<Option<Poll>, Error> {
        get_named(store, name)
    }

    /// The vote option stored under `name`, if there is one
    pub fn vote_option<S: Store>(&self, store: &S, name: &str) -> Result<Option<VoteOption>, Error> {
        get_named(store, name)
    }

    /// The poll index; empty if missing or undecodable
    pub fn poll_index<S: Store>(&self, store: &S) -> Result<PollIndex, Error> {
        Ok(store.get_record(POLL_INDEX_KEY)?.unwrap_or_default())
    }

    /// The open-poll log; empty if missing or undecodable
    pub fn open_polls<S: Store>(&self, store: &S) -> Result<OpenPollLog, Error> {
        Ok(store.get_record(OPEN_POLLS_KEY)?.unwrap_or_default())
    }

    /// Fail if `name` is already bound to a `T`, or in strict mode to anything at all
    fn claim<T: Named, S: Store>(&self, store: &S, name: &str) -> Result<(), Error> {
        match slot::<T, S>(store, name)? {
            Slot::Vacant => Ok(()),
            Slot::Taken => {
                warn!(key = name, kind = T::KIND, "already exists");
                Err(Error::AlreadyExists(format!("{} {}", T::KIND, name)))
            }
            Slot::Occupied if self.config.mode == Mode::Strict => Err(Error::AlreadyExists(
                format!("key {} (holds data that is not a {})", name, T::KIND),
            )),
            Slot::Occupied => {
                warn!(key = name, kind = T::KIND, "overwriting unrelated data");
                Ok(())
            }
        }
    }
}

fn slot<T: Named, S: Store>(store: &S, name: &str) -> Result<Slot, Error> {
    match store.get_state(name)? {
        None => Ok(Slot::Vacant),
        Some(bytes) if bytes.is_empty() => Ok(Slot::Vacant),
        Some(bytes) => match serde_json::from_slice::<T>(&bytes) {
            Ok(record) if record.name() == name => Ok(Slot::Taken),
            _ => Ok(Slot::Occupied),
        },
    }
}

fn get_named<T: Named, S: Store>(store: &S, name: &str) -> Result<Option<T>, Error> {
    let record: Option<T> = store.get_record(name)?;
    Ok(record.filter(|record| record.name() == name))
}

fn expect_args<A: AsRef<str>>(function: Function, args: &[A], expected: usize) -> Result<(), Error> {
    if args.len() != expected {
        return Err(Error::InvalidArgument(format!(
            "incorrect number of arguments for {}: expecting {}, got {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn non_empty(position: usize, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        let ordinal = match position {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            _ => "nth",
        };
        return Err(Error::InvalidArgument(format!(
            "{} argument must be a non-empty string",
            ordinal
        )));
    }
    Ok(())
}
