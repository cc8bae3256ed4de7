pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod probe;
pub mod repair;
pub mod report;
pub mod resume;
pub mod run;

pub use config::AppConfig;
pub use engine::RepairEngine;
pub use error::Error;
pub use repair::{Decision, RepairOutcome, RewriteOutcome, StorageFilename};
pub use resume::ResumeRecord;
