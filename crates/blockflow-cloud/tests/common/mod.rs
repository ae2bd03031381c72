use async_trait::async_trait;
use blockflow_cloud::{
    AdminCredentials, BackendHandle, CloudBackend, CloudError, ImageReference, ProvisionRequest,
    Result, VendorState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory backend that counts every call and can be told to fail
pub struct FakeBackend {
    resources: Mutex<HashMap<String, String>>,
    next_id: AtomicU64,
    pub create_calls: AtomicU64,
    pub destroy_calls: AtomicU64,
    pub query_calls: AtomicU64,
    fail_create: Mutex<bool>,
    fail_destroy: Mutex<bool>,
    fail_query: Mutex<bool>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            create_calls: AtomicU64::new(0),
            destroy_calls: AtomicU64::new(0),
            query_calls: AtomicU64::new(0),
            fail_create: Mutex::new(false),
            fail_destroy: Mutex::new(false),
            fail_query: Mutex::new(false),
        }
    }

    pub fn fail_create(&self, fail: bool) {
        *self.fail_create.lock().unwrap() = fail;
    }

    #[allow(dead_code)]
    pub fn fail_destroy(&self, fail: bool) {
        *self.fail_destroy.lock().unwrap() = fail;
    }

    #[allow(dead_code)]
    pub fn fail_query(&self, fail: bool) {
        *self.fail_query.lock().unwrap() = fail;
    }

    /// Overwrite the vendor state reported for every live resource
    pub fn set_vendor_state(&self, state: &str) {
        let mut resources = self.resources.lock().unwrap();
        for value in resources.values_mut() {
            *value = state.to_string();
        }
    }

    #[allow(dead_code)]
    pub fn live_resources(&self) -> usize {
        self.resources.lock().unwrap().len()
    }
}

#[async_trait]
impl CloudBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn create(&self, _request: &ProvisionRequest) -> Result<BackendHandle> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_create.lock().unwrap() {
            return Err(CloudError::ApiError("quota exceeded".to_string()));
        }
        let id = format!("vm-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.resources
            .lock()
            .unwrap()
            .insert(id.clone(), "running".to_string());
        Ok(BackendHandle::new(id).with_attribute("ip", serde_json::json!("10.0.0.4")))
    }

    async fn destroy(&self, handle: &BackendHandle) -> Result<()> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_destroy.lock().unwrap() {
            return Err(CloudError::ApiError("delete conflict".to_string()));
        }
        self.resources.lock().unwrap().remove(&handle.id);
        Ok(())
    }

    async fn query(&self, handle: &BackendHandle) -> Result<VendorState> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_query.lock().unwrap() {
            return Err(CloudError::ApiError("instance metadata unavailable".to_string()));
        }
        let resources = self.resources.lock().unwrap();
        match resources.get(&handle.id) {
            Some(state) => Ok(VendorState::new(state.clone())),
            None => Ok(VendorState::new("terminated")),
        }
    }
}

pub fn ubuntu_request(count: u32) -> ProvisionRequest {
    ProvisionRequest::new(
        ImageReference::new("Canonical", "UbuntuServer", "16.04.0-LTS", "latest"),
        "Standard_DS1_v2",
        10,
        AdminCredentials::new("ops", "correct-horse-battery"),
        count,
    )
    .unwrap()
}
