//! The ring store client.

use std::future::Future;
use std::sync::Arc;

use ring_core::{Error, PeerDirectory, Result, Ring, RingDescriptor, RingRecord};
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::service::MetadataService;

/// Reads and installs rings through a [`MetadataService`].
///
/// Every call is bounded by [`StoreConfig::timeout`]. Dropping a call's
/// future cancels it; because the service's install is all-or-nothing, a
/// cancelled or timed-out install never leaves a partial ring behind.
/// Conflicts are reported, never retried here.
#[derive(Clone)]
pub struct RingStore {
    service: Arc<dyn MetadataService>,
    config: StoreConfig,
}

impl RingStore {
    pub fn new(service: Arc<dyn MetadataService>, config: StoreConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The installed ring record, without resolving its peers.
    pub async fn current_record(&self) -> Result<RingRecord> {
        self.bounded("get ring", self.service.get_ring()).await
    }

    /// The installed ring, resolved against the current peer directory.
    pub async fn current_ring(&self) -> Result<Ring> {
        let (record, directory) =
            tokio::try_join!(self.current_record(), self.peer_directory())?;
        record.to_ring(&directory)
    }

    pub async fn peer_directory(&self) -> Result<PeerDirectory> {
        self.bounded("get peers", self.service.get_peers()).await
    }

    /// Every installed ring, oldest first.
    pub async fn history(&self) -> Result<Vec<RingRecord>> {
        self.bounded("get ring history", self.service.ring_history())
            .await
    }

    /// Install `candidate`; succeeds only if its version is exactly one past
    /// the installed ring's.
    pub async fn install_ring(&self, candidate: &RingDescriptor) -> Result<()> {
        let record = candidate.to_record();
        let result = self
            .bounded("set ring", self.service.set_ring(record))
            .await;

        match &result {
            Ok(()) => info!(
                kind = %candidate.kind(),
                version = candidate.version(),
                peers = candidate.peers().len(),
                replication_factor = candidate.replication_factor(),
                "installed ring"
            ),
            Err(Error::VersionConflict { current, candidate: attempted }) => {
                warn!(current, attempted, "ring install lost a version race")
            }
            Err(e) => warn!(error = %e, version = candidate.version(), "ring install failed"),
        }
        metrics::counter!("ring_install_total", "outcome" => install_outcome(&result))
            .increment(1);
        result
    }

    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let timeout = self.config.timeout();
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::MetadataUnavailable(format!(
                "{op} timed out after {timeout:?}"
            ))),
        }
    }
}

/// `outcome` label of `ring_install_total`.
fn install_outcome(result: &Result<()>) -> &'static str {
    match result {
        Ok(()) => "installed",
        Err(Error::VersionConflict { .. }) => "conflict",
        Err(Error::MetadataUnavailable(_)) => "unavailable",
        Err(_) => "rejected",
    }
}
