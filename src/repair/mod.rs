pub mod dates;
pub mod name;
pub mod path;
pub mod peers;
pub mod rewrite;
pub mod session;

pub use dates::{DatePolicy, DateStatus, SentinelYear, SentinelZone};
pub use name::{NameCheck, StorageFilename};
pub use path::resolve_content_path;
pub use rewrite::RewriteOutcome;
pub use session::{Decision, RepairOutcome, RepairSession, RepairStage};
