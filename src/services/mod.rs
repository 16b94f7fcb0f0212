//! Domain services sitting between the HTTP surface and the store:
//! directory writes, log and alert feeds, audit trail.

pub mod alerts;
pub mod audit;
pub mod directory;
pub mod logs;

pub use alerts::{Alert, AlertFeed, AlertFeedReader, AlertSummary, Tier};
pub use audit::{AuditLog, AuditStatus};
pub use directory::{CreatedUser, DirectoryError, NewUser, UserDirectoryService, UserListing};
pub use logs::{LogClass, LogError, LogReader, LogSummary};
