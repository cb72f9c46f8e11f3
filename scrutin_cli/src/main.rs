use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use num_enum::TryFromPrimitive;
use scrutin::{Chaincode, Config, Mode};
use std::convert::TryFrom;
use tracing_subscriber::EnvFilter;

mod command_invoke;
mod command_query;
mod state;

pub use command_invoke::*;
pub use command_query::*;

#[derive(TryFromPrimitive, PartialEq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum Verbosity {
    Warn = 0,
    Info = 1,
    Debug = 2,
}

impl Verbosity {
    fn from_occurrences(count: u64) -> Self {
        let count = u8::try_from(count).unwrap_or(u8::MAX);
        Verbosity::try_from_primitive(count).unwrap_or(Verbosity::Debug)
    }

    fn directive(&self) -> &'static str {
        match self {
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

fn main() {
    let function_arg_defs = || {
        vec![
            Arg::with_name("FUNCTION")
                .index(1)
                .required(true)
                .help("Function name, e.g. init_scrutin"),
            Arg::with_name("ARGS")
                .index(2)
                .multiple(true)
                .allow_hyphen_values(true)
                .help("Function arguments, passed as strings"),
        ]
    };

    let matches = App::new("Scrutin CLI")
        .version("0.1")
        .about("Runs scrutin chaincode invocations against a local state file")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("state")
                .long("state")
                .takes_value(true)
                .global(true)
                .help("Set the state file - can also be set with SCRUTIN_STATE"),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .global(true)
                .help("Fail instead of silently skipping missing scrutins and votes"),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("init")
                .about("Reset the chaincode state (deploy-time init)")
                .arg(
                    Arg::with_name("VALUE")
                        .index(1)
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Integer written to the reset counter"),
                ),
        )
        .subcommand(
            SubCommand::with_name("invoke")
                .about("Run a state-changing function")
                .args(&function_arg_defs()),
        )
        .subcommand(
            SubCommand::with_name("query")
                .about("Run a read-only function")
                .args(&function_arg_defs()),
        )
        .get_matches();

    // Global args are propagated down, so read everything from the subcommand
    let (name, matches) = match matches.subcommand() {
        (name, Some(matches)) => (name, matches),
        _ => unreachable!("clap requires a subcommand"),
    };

    let verbosity = Verbosity::from_occurrences(matches.occurrences_of("v"));
    init_tracing(verbosity);

    let state_path = state_path(matches);
    let chaincode = Chaincode::new(config(matches));

    match name {
        "init" => command_init(matches, &state_path, &chaincode),
        "invoke" => command_invoke(matches, &state_path, &chaincode),
        "query" => command_query(matches, &state_path, &chaincode),
        _ => unreachable!("unknown subcommand {}", name),
    }
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn state_path(matches: &ArgMatches) -> String {
    let env_var = std::env::var("SCRUTIN_STATE");
    let path = match matches.value_of("state") {
        Some(path) => path,
        None => env_var.as_deref().unwrap_or("./scrutin-state.json"),
    };
    expand(path)
}

fn config(matches: &ArgMatches) -> Config {
    let mut config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    if matches.is_present("strict") {
        config.mode = Mode::Strict;
    }
    config
}

pub fn expand(filename: &str) -> String {
    shellexpand::tilde(filename).into_owned()
}

/// Function arguments of an `invoke` or `query` subcommand
pub fn function_args<'a>(matches: &'a ArgMatches) -> (&'a str, Vec<&'a str>) {
    let function = matches.value_of("FUNCTION").unwrap_or_default();
    let args = matches
        .values_of("ARGS")
        .map(|values| values.collect())
        .unwrap_or_default();
    (function, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        assert_eq!(Verbosity::from_occurrences(0), Verbosity::Warn);
        assert_eq!(Verbosity::from_occurrences(1), Verbosity::Info);
        assert_eq!(Verbosity::from_occurrences(2), Verbosity::Debug);
        assert_eq!(Verbosity::from_occurrences(300), Verbosity::Debug);
        assert_eq!(Verbosity::Info.directive(), "info");
    }
}
