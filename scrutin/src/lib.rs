#[macro_use]
extern crate serde;

mod chaincode;
mod clock;
mod config;
mod error;
mod index;
mod poll;
mod serde_null;
mod store;
mod tally;

pub use chaincode::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use index::*;
pub use poll::*;
pub use store::*;
pub use tally::*;
