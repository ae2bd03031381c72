//! Cloud backend trait definition

use crate::error::Result;
use crate::request::ProvisionRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cloud backend abstraction trait
///
/// All compute backends (vendor SDKs, CLI wrappers, test fakes) implement
/// this trait to provide a unified interface for block provisioning.
///
/// Every operation may block for the duration of the underlying vendor
/// call; the manager applies no timeout of its own, so callers wrap these
/// with their own deadlines if needed.
///
/// `create` is treated as atomic by the manager: an implementation that
/// provisions several vendor resources in sequence (network, NIC, VM,
/// disk) must report a failure after partial progress through the returned
/// error's diagnostic, since the manager only exposes the block as failed
/// and performs no compensation.
#[async_trait]
pub trait CloudBackend: Send + Sync {
    /// Returns the backend name (e.g., "azure", "ec2")
    fn name(&self) -> &str;

    /// Provision the resources for one block and return its handle
    async fn create(&self, request: &ProvisionRequest) -> Result<BackendHandle>;

    /// Tear down the resources behind a handle
    async fn destroy(&self, handle: &BackendHandle) -> Result<()>;

    /// Query the vendor-reported state of a handle
    async fn query(&self, handle: &BackendHandle) -> Result<VendorState>;
}

/// Opaque reference to the vendor resources backing a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHandle {
    /// Vendor-assigned resource identifier
    pub id: String,

    /// Vendor extras (IP address, resource group, ...)
    pub attributes: HashMap<String, serde_json::Value>,
}

impl BackendHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Raw status string reported by a backend's query operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorState(String);

impl VendorState {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VendorState {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl std::fmt::Display for VendorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
