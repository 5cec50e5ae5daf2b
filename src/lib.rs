pub mod config;
pub mod engine;
pub mod error;
pub mod funbox;
pub mod mode;
pub mod report;
pub mod result;
pub mod store;
pub mod units;

pub use config::Config;
pub use error::{Error, Result};
pub use report::{ResultContext, ResultFlags, ResultReport, Tag, finalize_result};
pub use result::TestResult;
pub use store::{FileStore, KeyValue, Ledger, MemoryStore};
pub use units::{SpeedUnit, UnitRegistry};
