//! Blockflow compute block lifecycle
//!
//! This crate provides the compute backend abstraction for Blockflow and
//! the lifecycle manager that workflow engines drive to acquire and release
//! blocks of virtual-machine capacity.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Workflow executor                   │
//! │          (submit / status / cancel)              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               blockflow-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        BlockLifecycleManager              │   │
//! │  │  block map · per-id gates · capacity      │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait CloudBackend { create, destroy,    │   │
//! │  │                       query }             │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │ vendor SDK    │ │  test fakes   │
//! │  backends     │ │               │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! The manager is pull-based: it performs no background polling and only
//! refreshes block state inside explicit `status` calls, matching the way
//! workflow engines integrate provisioning providers.

pub mod backend;
pub mod block;
pub mod error;
pub mod manager;
pub mod request;

// Re-exports
pub use backend::{BackendHandle, CloudBackend, VendorState};
pub use block::{Block, BlockId, Status};
pub use error::{CloudError, Result};
pub use manager::{BlockLifecycleManager, ManagerConfig, ScaleReport};
pub use request::{AdminCredentials, ImageReference, ProvisionRequest};
