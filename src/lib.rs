pub mod entry;
pub mod error;
pub mod eval;
pub mod ledger;
pub mod money;
pub mod snapshot;
pub mod store;
