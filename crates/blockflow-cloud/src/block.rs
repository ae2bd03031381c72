//! Block state model and vendor-state translation

use crate::backend::{BackendHandle, VendorState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a logical compute block
///
/// Allocated by the manager, unique across the manager's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    pub(crate) fn from_sequence(seq: u64) -> Self {
        Self(format!("block-{seq:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Provisioning requested, not yet confirmed by the backend
    Pending,
    /// Backend confirmed the block is up
    Running,
    /// Vendor reported a terminal state
    Completed,
    /// Provisioning or a later query failed
    Failed,
}

impl Status {
    /// Translate a vendor-reported state into the internal status.
    ///
    /// Total and case-insensitive. States not in the table map to
    /// `Pending` so capacity is never freed on an unrecognized report.
    pub fn from_vendor(state: &VendorState) -> Self {
        match state.as_str().to_ascii_lowercase().as_str() {
            "pending" => Status::Pending,
            "running" => Status::Running,
            "terminated" | "shutting-down" | "stopping" | "stopped" => Status::Completed,
            _ => Status::Pending,
        }
    }

    /// Whether the block counts toward current capacity
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Pending | Status::Running)
    }

    /// Terminal statuses admit no further transitions except removal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Failed)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Running => write!(f, "running"),
            Status::Completed => write!(f, "completed"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

/// A logical unit of requested compute capacity
///
/// Owned exclusively by the lifecycle manager; callers only ever see
/// clones taken under the manager's lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Manager-assigned identifier
    pub id: BlockId,

    /// Node count requested for this block
    pub capacity: u32,

    /// Current lifecycle status
    pub status: Status,

    /// Backend-assigned handle, absent until creation succeeds
    pub handle: Option<BackendHandle>,

    /// When the block was submitted
    pub created_at: DateTime<Utc>,
}

impl Block {
    pub(crate) fn new(id: BlockId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            status: Status::Pending,
            handle: None,
            created_at: Utc::now(),
        }
    }
}
