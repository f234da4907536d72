pub mod config;
pub mod console;
pub mod error;
pub mod ledger;
pub mod period;
pub mod session;
pub mod tally;
