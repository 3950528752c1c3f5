// Public modules
pub mod catalog;
pub mod collide;
pub mod convention;
pub mod error;
pub mod execute;
pub mod handle;
pub mod history;
pub mod host;
pub mod paths;
pub mod plan;
pub mod transform;
pub mod validate;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use handle::{RenamableHandle, RenameRecord};
pub use host::{MemoryHost, RenameHost, TargetFilter};
pub use transform::{RenameRule, ReplaceMode};
