//! Provision request value types

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};

/// Marketplace image reference (publisher/offer/sku/version)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
}

impl ImageReference {
    pub fn new(
        publisher: impl Into<String>,
        offer: impl Into<String>,
        sku: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            publisher: publisher.into(),
            offer: offer.into(),
            sku: sku.into(),
            version: version.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.publisher.is_empty()
            && !self.offer.is_empty()
            && !self.sku.is_empty()
            && !self.version.is_empty()
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.publisher, self.offer, self.sku, self.version
        )
    }
}

/// Login credentials for the created instances
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs and error messages.
impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable description of the resource shape for one block
///
/// Validated at construction; fields are read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionRequest {
    image: ImageReference,
    size: String,
    disk_size_gb: u32,
    admin: AdminCredentials,
    count: u32,
}

impl ProvisionRequest {
    pub fn new(
        image: ImageReference,
        size: impl Into<String>,
        disk_size_gb: u32,
        admin: AdminCredentials,
        count: u32,
    ) -> Result<Self> {
        let size = size.into();

        if count == 0 {
            return Err(CloudError::Configuration(
                "node count must be at least 1".to_string(),
            ));
        }
        if size.is_empty() {
            return Err(CloudError::Configuration(
                "size class must not be empty".to_string(),
            ));
        }
        if disk_size_gb == 0 {
            return Err(CloudError::Configuration(
                "disk size must be at least 1 GB".to_string(),
            ));
        }
        if !image.is_complete() {
            return Err(CloudError::Configuration(format!(
                "incomplete image reference: {image}"
            )));
        }
        if admin.username.is_empty() || admin.password.is_empty() {
            return Err(CloudError::Configuration(
                "admin credentials must not be empty".to_string(),
            ));
        }

        Ok(Self {
            image,
            size,
            disk_size_gb,
            admin,
            count,
        })
    }

    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn disk_size_gb(&self) -> u32 {
        self.disk_size_gb
    }

    pub fn admin(&self) -> &AdminCredentials {
        &self.admin
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
