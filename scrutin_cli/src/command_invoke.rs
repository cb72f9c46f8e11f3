use crate::state;
use scrutin::{Chaincode, Clock, MemStore};

pub fn command_init<C: Clock>(matches: &clap::ArgMatches, state_path: &str, chaincode: &Chaincode<C>) {
    let value = matches.value_of("VALUE").unwrap_or_default();
    commit(state_path, "init", |store| chaincode.init(store, &[value]));
}

pub fn command_invoke<C: Clock>(
    matches: &clap::ArgMatches,
    state_path: &str,
    chaincode: &Chaincode<C>,
) {
    let (function, args) = crate::function_args(matches);
    commit(state_path, function, |store| {
        chaincode.invoke(store, function, &args)
    });
}

/// Run one invocation against a copy of the state, saving the copy only if it succeeds
fn commit<F>(state_path: &str, function: &str, invocation: F)
where
    F: FnOnce(&mut MemStore) -> Result<Vec<u8>, scrutin::Error>,
{
    let mut store = state::load(state_path).unwrap_or_else(|e| {
        eprintln!("scrutin {}: {}", function, e);
        std::process::exit(1);
    });

    let result = invocation(&mut store).unwrap_or_else(|e| {
        eprintln!("scrutin {}: {}", function, e);
        std::process::exit(1);
    });

    state::save(state_path, store).unwrap_or_else(|e| {
        eprintln!("scrutin {}: {}", function, e);
        std::process::exit(1);
    });
    tracing::info!(function, state = state_path, "state committed");

    crate::print_result(&result);
}
