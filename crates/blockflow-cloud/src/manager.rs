//! Block lifecycle manager
//!
//! Owns the authoritative map from block id to provisioning state and
//! translates submit/status/cancel/scale intent into backend calls.

use crate::backend::CloudBackend;
use crate::block::{Block, BlockId, Status};
use crate::error::{CloudError, Result};
use crate::request::ProvisionRequest;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Manager configuration
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Template request cloned by `scale`/`bootstrap` for new blocks
    pub request: ProvisionRequest,

    /// Capacity `bootstrap` converges to
    pub init_blocks: usize,

    /// Lower bound accepted by `scale`
    pub min_blocks: usize,

    /// Upper bound accepted by `scale`
    pub max_blocks: usize,

    /// Accept cancellations without tearing anything down
    pub linger: bool,
}

impl ManagerConfig {
    pub fn new(request: ProvisionRequest) -> Self {
        Self {
            request,
            init_blocks: 1,
            min_blocks: 0,
            max_blocks: 10,
            linger: false,
        }
    }

    pub fn with_init_blocks(mut self, init_blocks: usize) -> Self {
        self.init_blocks = init_blocks;
        self
    }

    pub fn with_bounds(mut self, min_blocks: usize, max_blocks: usize) -> Self {
        self.min_blocks = min_blocks;
        self.max_blocks = max_blocks;
        self
    }

    pub fn with_linger(mut self, linger: bool) -> Self {
        self.linger = linger;
        self
    }
}

/// Result of a `scale` convergence pass
#[derive(Debug, Clone, Default)]
pub struct ScaleReport {
    /// Blocks submitted to grow toward the target
    pub submitted: Vec<BlockId>,

    /// Cancellation outcome per block released to shrink toward the target
    pub released: HashMap<BlockId, bool>,
}

impl ScaleReport {
    pub fn is_noop(&self) -> bool {
        self.submitted.is_empty() && self.released.is_empty()
    }
}

impl std::fmt::Display for ScaleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let failures = self.released.values().filter(|ok| !**ok).count();
        write!(
            f,
            "{} submitted, {} released, {} release failures",
            self.submitted.len(),
            self.released.len() - failures,
            failures
        )
    }
}

/// A block plus the gate serializing same-id operations
struct Entry {
    block: Block,
    gate: Arc<Mutex<()>>,
}

/// Authoritative view of which blocks exist and their lifecycle state
///
/// The manager performs no background polling: state refresh happens only
/// inside explicit `status` calls. Distinct block ids may be submitted and
/// cancelled concurrently; operations against the same id are serialized
/// through a per-block gate. The block map is the single shared
/// synchronization point and is never held across a backend call.
pub struct BlockLifecycleManager {
    backend: Arc<dyn CloudBackend>,
    config: ManagerConfig,
    blocks: Mutex<HashMap<BlockId, Entry>>,
    next_seq: AtomicU64,
}

impl BlockLifecycleManager {
    /// Create a manager over the given backend.
    ///
    /// Fails with `CloudError::Configuration` when the scale bounds are
    /// inverted.
    pub fn new(backend: Arc<dyn CloudBackend>, config: ManagerConfig) -> Result<Self> {
        if config.min_blocks > config.max_blocks {
            return Err(CloudError::Configuration(format!(
                "min_blocks ({}) exceeds max_blocks ({})",
                config.min_blocks, config.max_blocks
            )));
        }

        Ok(Self {
            backend,
            config,
            blocks: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
        })
    }

    /// Provision one block for `request`.
    ///
    /// The returned id is unique across the manager's lifetime. On backend
    /// failure the block stays in the map as `Failed` (visible to `status`,
    /// removable via `cancel`) and the backend diagnostic is surfaced.
    pub async fn submit(&self, request: ProvisionRequest) -> Result<BlockId> {
        let id = BlockId::from_sequence(self.next_seq.fetch_add(1, Ordering::Relaxed));
        let gate = Arc::new(Mutex::new(()));

        {
            let mut blocks = self.blocks.lock().await;
            blocks.insert(
                id.clone(),
                Entry {
                    block: Block::new(id.clone(), request.count()),
                    gate: gate.clone(),
                },
            );
        }

        let _guard = gate.lock().await;

        tracing::info!(
            "Creating block {} ({} nodes, image {}, size {})",
            id,
            request.count(),
            request.image(),
            request.size()
        );

        match self.backend.create(&request).await {
            Ok(handle) => {
                let mut blocks = self.blocks.lock().await;
                if let Some(entry) = blocks.get_mut(&id) {
                    entry.block.handle = Some(handle);
                    entry.block.status = Status::Running;
                }
                tracing::info!("Block {} is running", id);
                Ok(id)
            }
            Err(e) => {
                let mut blocks = self.blocks.lock().await;
                if let Some(entry) = blocks.get_mut(&id) {
                    entry.block.status = Status::Failed;
                }
                tracing::warn!("Block {} failed to provision: {}", id, e);
                Err(CloudError::Provisioning {
                    block_id: id.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Refresh and report the status of each id.
    ///
    /// Terminal blocks and blocks without a handle report their cached
    /// status without a backend call. A query failure marks the block
    /// `Failed` and aborts the batch with the backend diagnostic.
    pub async fn status(&self, ids: &[BlockId]) -> Result<HashMap<BlockId, Status>> {
        let mut result = HashMap::new();

        for id in ids {
            let (gate, cached) = {
                let blocks = self.blocks.lock().await;
                let entry = blocks
                    .get(id)
                    .ok_or_else(|| CloudError::BlockNotFound(id.to_string()))?;
                (entry.gate.clone(), entry.block.status)
            };

            if cached.is_terminal() {
                result.insert(id.clone(), cached);
                continue;
            }

            let _guard = gate.lock().await;

            let handle = {
                let blocks = self.blocks.lock().await;
                let entry = blocks
                    .get(id)
                    .ok_or_else(|| CloudError::BlockNotFound(id.to_string()))?;
                if entry.block.status.is_terminal() {
                    result.insert(id.clone(), entry.block.status);
                    continue;
                }
                match &entry.block.handle {
                    Some(handle) => handle.clone(),
                    None => {
                        result.insert(id.clone(), entry.block.status);
                        continue;
                    }
                }
            };

            match self.backend.query(&handle).await {
                Ok(vendor) => {
                    let refreshed = Status::from_vendor(&vendor);
                    tracing::debug!("Block {} vendor state '{}' -> {}", id, vendor, refreshed);
                    let mut blocks = self.blocks.lock().await;
                    if let Some(entry) = blocks.get_mut(id) {
                        entry.block.status = refreshed;
                    }
                    result.insert(id.clone(), refreshed);
                }
                Err(e) => {
                    let mut blocks = self.blocks.lock().await;
                    if let Some(entry) = blocks.get_mut(id) {
                        entry.block.status = Status::Failed;
                    }
                    return Err(CloudError::Provisioning {
                        block_id: id.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(result)
    }

    /// Tear down the given blocks.
    ///
    /// With linger enabled every id is reported `false` and the backend is
    /// never called. Otherwise unknown ids reject the whole batch before
    /// any teardown; backend failures are swallowed into a `false` entry so
    /// a batch can report partial success.
    pub async fn cancel(&self, ids: &[BlockId]) -> Result<HashMap<BlockId, bool>> {
        if self.config.linger {
            tracing::debug!("Linger enabled; leaving {} block(s) alive", ids.len());
            return Ok(ids.iter().map(|id| (id.clone(), false)).collect());
        }

        {
            let blocks = self.blocks.lock().await;
            for id in ids {
                if !blocks.contains_key(id) {
                    return Err(CloudError::BlockNotFound(id.to_string()));
                }
            }
        }

        let mut result = HashMap::new();
        for id in ids {
            result.insert(id.clone(), self.release(id).await);
        }
        Ok(result)
    }

    /// Destroy one block's resources and drop it from the map.
    async fn release(&self, id: &BlockId) -> bool {
        let gate = {
            let blocks = self.blocks.lock().await;
            match blocks.get(id) {
                Some(entry) => entry.gate.clone(),
                // Removed by a racing cancel; the id is gone either way.
                None => return true,
            }
        };

        let _guard = gate.lock().await;

        let handle = {
            let blocks = self.blocks.lock().await;
            match blocks.get(id) {
                Some(entry) => entry.block.handle.clone(),
                None => return true,
            }
        };

        if let Some(handle) = handle {
            tracing::info!("Destroying block {} (resource {})", id, handle.id);
            if let Err(e) = self.backend.destroy(&handle).await {
                tracing::warn!("Failed to destroy block {}: {}", id, e);
                return false;
            }
        }

        let mut blocks = self.blocks.lock().await;
        blocks.remove(id);
        true
    }

    /// Converge capacity toward `target` in a single pass.
    ///
    /// Fails fast with `CloudError::Configuration` when `target` is outside
    /// the configured bounds, before any backend call. Growing submits
    /// clones of the template request; shrinking cancels the newest active
    /// blocks first.
    pub async fn scale(&self, target: usize) -> Result<ScaleReport> {
        if target < self.config.min_blocks || target > self.config.max_blocks {
            return Err(CloudError::Configuration(format!(
                "scale target {} outside bounds {}..={}",
                target, self.config.min_blocks, self.config.max_blocks
            )));
        }

        let current = self.current_capacity().await;
        let mut report = ScaleReport::default();

        if current < target {
            for _ in 0..(target - current) {
                let id = self.submit(self.config.request.clone()).await?;
                report.submitted.push(id);
            }
        } else if current > target {
            let mut active: Vec<BlockId> = {
                let blocks = self.blocks.lock().await;
                blocks
                    .values()
                    .filter(|entry| entry.block.status.is_active())
                    .map(|entry| entry.block.id.clone())
                    .collect()
            };
            // Ids are monotonic, so sorted order is creation order.
            active.sort();
            let excess: Vec<BlockId> =
                active.into_iter().rev().take(current - target).collect();
            report.released = self.cancel(&excess).await?;
        }

        tracing::info!("Scale to {}: {}", target, report);
        Ok(report)
    }

    /// Bring capacity up to the configured `init_blocks`.
    pub async fn bootstrap(&self) -> Result<ScaleReport> {
        self.scale(self.config.init_blocks).await
    }

    /// Number of blocks currently counted as capacity (pending or running)
    pub async fn current_capacity(&self) -> usize {
        let blocks = self.blocks.lock().await;
        blocks
            .values()
            .filter(|entry| entry.block.status.is_active())
            .count()
    }

    /// Point-in-time snapshot of every tracked block, in creation order
    pub async fn blocks(&self) -> Vec<Block> {
        let blocks = self.blocks.lock().await;
        let mut all: Vec<Block> = blocks.values().map(|entry| entry.block.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn linger(&self) -> bool {
        self.config.linger
    }
}
