//! The metadata service boundary.

use async_trait::async_trait;
use ring_core::{Error, PeerDirectory, Result, RingRecord};

/// The external service that owns the authoritative ring and peer list.
///
/// Reads may run concurrently and unsynchronized. [`set_ring`] is the only
/// write and must be an atomic compare-and-swap on the ring version: it
/// succeeds only if `candidate.version == current.version + 1` at commit
/// time, and a cancelled or failed call leaves the current ring untouched.
///
/// [`set_ring`]: MetadataService::set_ring
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// The currently installed ring.
    async fn get_ring(&self) -> Result<RingRecord>;

    /// The current peer directory.
    async fn get_peers(&self) -> Result<PeerDirectory>;

    /// Install `candidate` if it is the direct successor of the current ring.
    async fn set_ring(&self, candidate: RingRecord) -> Result<()>;

    /// Every installed ring, oldest first. Superseded rings are kept for
    /// audit only.
    async fn ring_history(&self) -> Result<Vec<RingRecord>>;
}

/// Compare-and-swap precondition shared by the bundled services.
pub(crate) fn check_successor(current: &RingRecord, candidate: &RingRecord) -> Result<()> {
    candidate.check_format()?;
    if current.version.checked_add(1) != Some(candidate.version) {
        return Err(Error::VersionConflict {
            current: current.version,
            candidate: candidate.version,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(version: u64) -> RingRecord {
        RingRecord {
            version,
            ..RingRecord::genesis()
        }
    }

    #[test]
    fn test_successor_accepted() {
        assert!(check_successor(&at(4), &at(5)).is_ok());
    }

    #[test]
    fn test_stale_and_skipping_versions_conflict() {
        for candidate in [3, 4, 6] {
            assert_eq!(
                check_successor(&at(4), &at(candidate)).unwrap_err(),
                Error::VersionConflict {
                    current: 4,
                    candidate
                }
            );
        }
    }

    #[test]
    fn test_no_successor_after_last_version() {
        for candidate in [0, u64::MAX] {
            assert_eq!(
                check_successor(&at(u64::MAX), &at(candidate)).unwrap_err(),
                Error::VersionConflict {
                    current: u64::MAX,
                    candidate
                }
            );
        }
    }
}
