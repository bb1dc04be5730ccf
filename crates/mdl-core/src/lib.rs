pub mod config;
pub mod logging;

pub mod checksum;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod input;
pub mod report;
pub mod storage;
pub mod url_model;

pub use dispatcher::{DispatchConfig, Dispatcher, RunObserver};
pub use error::EntryError;
pub use handlers::{ExternalHandlers, MediaHandlers};
pub use report::RunSummary;
