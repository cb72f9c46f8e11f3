use crate::state;
use content_inspector::ContentType;
use scrutin::{Chaincode, Clock};

pub fn command_query<C: Clock>(
    matches: &clap::ArgMatches,
    state_path: &str,
    chaincode: &Chaincode<C>,
) {
    let (function, args) = crate::function_args(matches);

    let store = state::load(state_path).unwrap_or_else(|e| {
        eprintln!("scrutin {}: {}", function, e);
        std::process::exit(1);
    });

    let result = chaincode.query(&store, function, &args).unwrap_or_else(|e| {
        eprintln!("scrutin {}: {}", function, e);
        std::process::exit(1);
    });

    print_result(&result);
}

/// Print result bytes as text when they are UTF-8, as hex otherwise
pub fn print_result(result: &[u8]) {
    if let Some(line) = render(result) {
        println!("{}", line);
    }
}

fn render(result: &[u8]) -> Option<String> {
    if result.is_empty() {
        return None;
    }
    match content_inspector::inspect(result) {
        ContentType::UTF_8 | ContentType::UTF_8_BOM => {
            Some(String::from_utf8_lossy(result).into_owned())
        }
        _ => Some(hex::encode(result)),
    }
}
