//! Configuration options for sync runs.
//!
//! # Example
//!
//! ```
//! use smartcp::SyncOptions;
//!
//! // Only report what would be copied
//! let options = SyncOptions::default().with_plan();
//! assert!(options.plan);
//! ```

/// Options for a sync run.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `plan` | `false` | Copy files (`true`: only log decisions) |
/// | `fsync` | `true` | Sync to disk after write |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Evaluate and log every decision without writing anything
    pub plan: bool,

    /// Whether to sync copied files to disk before renaming them into
    /// place (default: true)
    pub fsync: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            plan: false,
            fsync: true,
        }
    }
}

impl SyncOptions {
    /// Only report what would be copied
    #[must_use]
    pub fn with_plan(mut self) -> Self {
        self.plan = true;
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }
}
