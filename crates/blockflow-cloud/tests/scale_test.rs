mod common;

use blockflow_cloud::{BlockLifecycleManager, CloudError, ManagerConfig, Status};
use common::{ubuntu_request, FakeBackend};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_scale_up_to_target() {
    let backend = Arc::new(FakeBackend::new());
    let manager =
        BlockLifecycleManager::new(backend.clone(), ManagerConfig::new(ubuntu_request(1)))
            .unwrap();

    let report = manager.scale(3).await.unwrap();
    assert_eq!(report.submitted.len(), 3);
    assert!(report.released.is_empty());
    assert_eq!(manager.current_capacity().await, 3);
    assert_eq!(backend.create_calls.load(Ordering::SeqCst), 3);

    // Already at target: nothing to do.
    let report = manager.scale(3).await.unwrap();
    assert!(report.is_noop());
    assert_eq!(backend.create_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_scale_down_releases_newest_first() {
    let backend = Arc::new(FakeBackend::new());
    let manager =
        BlockLifecycleManager::new(backend.clone(), ManagerConfig::new(ubuntu_request(1)))
            .unwrap();

    let oldest = manager.submit(ubuntu_request(1)).await.unwrap();
    let middle = manager.submit(ubuntu_request(1)).await.unwrap();
    let newest = manager.submit(ubuntu_request(1)).await.unwrap();

    let report = manager.scale(1).await.unwrap();
    assert!(report.submitted.is_empty());
    assert_eq!(report.released.len(), 2);
    assert_eq!(report.released.get(&newest), Some(&true));
    assert_eq!(report.released.get(&middle), Some(&true));
    assert!(!report.released.contains_key(&oldest));

    assert_eq!(manager.current_capacity().await, 1);
    let survivors = manager.blocks().await;
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].id, oldest);
}

#[tokio::test]
async fn test_scale_outside_bounds_makes_no_backend_calls() {
    let backend = Arc::new(FakeBackend::new());
    let config = ManagerConfig::new(ubuntu_request(1)).with_bounds(1, 4);
    let manager = BlockLifecycleManager::new(backend.clone(), config).unwrap();

    let result = manager.scale(5).await;
    assert!(matches!(result, Err(CloudError::Configuration(_))));

    let result = manager.scale(0).await;
    assert!(matches!(result, Err(CloudError::Configuration(_))));

    assert_eq!(backend.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.destroy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scale_ignores_terminal_blocks() {
    let backend = Arc::new(FakeBackend::new());
    let manager =
        BlockLifecycleManager::new(backend.clone(), ManagerConfig::new(ubuntu_request(1)))
            .unwrap();

    let id = manager.submit(ubuntu_request(1)).await.unwrap();
    backend.set_vendor_state("terminated");
    let statuses = manager.status(std::slice::from_ref(&id)).await.unwrap();
    assert_eq!(statuses.get(&id), Some(&Status::Completed));

    // The completed block freed its capacity, so scaling to 1 submits a
    // fresh one instead of counting the dead block.
    let report = manager.scale(1).await.unwrap();
    assert_eq!(report.submitted.len(), 1);
    assert_eq!(manager.current_capacity().await, 1);
}

#[tokio::test]
async fn test_scale_propagates_submit_failure() {
    let backend = Arc::new(FakeBackend::new());
    let manager =
        BlockLifecycleManager::new(backend.clone(), ManagerConfig::new(ubuntu_request(1)))
            .unwrap();

    manager.submit(ubuntu_request(1)).await.unwrap();
    backend.fail_create(true);

    let result = manager.scale(3).await;
    assert!(matches!(result, Err(CloudError::Provisioning { .. })));
    // The block created before the failure survives.
    assert_eq!(manager.current_capacity().await, 1);
}

#[tokio::test]
async fn test_bootstrap_converges_to_init_blocks() {
    let backend = Arc::new(FakeBackend::new());
    let config = ManagerConfig::new(ubuntu_request(1)).with_init_blocks(2);
    let manager = BlockLifecycleManager::new(backend.clone(), config).unwrap();

    let report = manager.bootstrap().await.unwrap();
    assert_eq!(report.submitted.len(), 2);
    assert_eq!(manager.current_capacity().await, 2);

    let report = manager.bootstrap().await.unwrap();
    assert!(report.is_noop());
}

#[tokio::test]
async fn test_scale_down_with_linger_reports_failures() {
    let backend = Arc::new(FakeBackend::new());
    let config = ManagerConfig::new(ubuntu_request(1)).with_linger(true);
    let manager = BlockLifecycleManager::new(backend.clone(), config).unwrap();

    manager.submit(ubuntu_request(1)).await.unwrap();
    manager.submit(ubuntu_request(1)).await.unwrap();

    let report = manager.scale(0).await.unwrap();
    assert_eq!(report.released.len(), 2);
    assert!(report.released.values().all(|ok| !ok));
    // Nothing was actually torn down.
    assert_eq!(manager.current_capacity().await, 2);
    assert_eq!(backend.destroy_calls.load(Ordering::SeqCst), 0);
}
