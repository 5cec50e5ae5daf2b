pub mod corpus;
pub mod kv;
pub mod ledger;

pub use kv::{FileStore, KeyValue, MemoryStore};
pub use ledger::Ledger;
