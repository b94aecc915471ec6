//! Metadata service backed by a single JSON file.
//!
//! The file holds the peer directory and the full ring history. Every write
//! takes an exclusive OS lock on a sibling `<file>.lock` for the whole
//! load, check, write and rename, so the compare-and-swap holds across
//! handles and processes sharing the path. Each writer stages into its own
//! temporary file in the same directory and renames it over the metadata
//! file: a reader sees either the old or the new state, never a partial
//! write.
//!
//! The locked section runs on the blocking pool. Dropping an install's future
//! does not stop a write that already holds the lock; it still commits or
//! fails as a whole.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fd_lock::RwLock;
use ring_core::{Error, Peer, PeerDirectory, Result, RingRecord};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::service::{check_successor, MetadataService};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileState {
    #[serde(default)]
    peers: PeerDirectory,
    #[serde(default = "genesis_history")]
    rings: Vec<RingRecord>,
}

fn genesis_history() -> Vec<RingRecord> {
    vec![RingRecord::genesis()]
}

impl Default for FileState {
    fn default() -> Self {
        Self {
            peers: PeerDirectory::default(),
            rings: genesis_history(),
        }
    }
}

impl FileState {
    fn current(&self) -> RingRecord {
        self.rings.last().cloned().unwrap_or_else(RingRecord::genesis)
    }
}

pub struct FileMetadata {
    path: PathBuf,
}

impl FileMetadata {
    /// Use the file at `path`. A missing file reads as a fresh cluster.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add or replace a peer in the directory.
    pub async fn register_peer(&self, peer: Peer) -> Result<()> {
        debug!(peer = %peer.id, address = %peer.address, "registering peer");
        self.update(move |state| {
            state.peers = state.peers.with_peer(peer);
            Ok(())
        })
        .await
    }

    async fn load(&self) -> Result<FileState> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => parse(&self.path, &bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileState::default()),
            Err(e) => Err(unavailable(&self.path, e)),
        }
    }

    /// Apply `change` to the stored state under the file lock. Nothing is
    /// written if `change` fails.
    async fn update<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut FileState) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || locked_update(&path, change))
            .await
            .map_err(|e| Error::MetadataUnavailable(format!("metadata writer failed: {e}")))?
    }
}

fn locked_update<T>(path: &Path, change: impl FnOnce(&mut FileState) -> Result<T>) -> Result<T> {
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(path))
        .map_err(|e| unavailable(path, e))?;
    let mut lock = RwLock::new(lock_file);
    let _guard = lock.write().map_err(|e| unavailable(path, e))?;

    let mut state = match std::fs::read(path) {
        Ok(bytes) => parse(path, &bytes)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => FileState::default(),
        Err(e) => return Err(unavailable(path, e)),
    };
    let out = change(&mut state)?;
    persist(path, &state)?;
    Ok(out)
}

fn persist(path: &Path, state: &FileState) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(state)
        .map_err(|e| Error::Codec(format!("{}: {e}", path.display())))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| unavailable(path, e))?;
    tmp.write_all(&bytes).map_err(|e| unavailable(path, e))?;
    tmp.as_file().sync_all().map_err(|e| unavailable(path, e))?;
    tmp.persist(path)
        .map(|_: File| ())
        .map_err(|e| unavailable(path, e.error))
}

/// `ring.json` locks through `ring.json.lock`. The data file itself is
/// replaced on every write, so it cannot carry the lock.
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("ring-metadata"));
    name.push(".lock");
    path.with_file_name(name)
}

fn parse(path: &Path, bytes: &[u8]) -> Result<FileState> {
    serde_json::from_slice(bytes).map_err(|e| Error::Codec(format!("{}: {e}", path.display())))
}

fn unavailable(path: &Path, e: io::Error) -> Error {
    Error::MetadataUnavailable(format!("{}: {e}", path.display()))
}

#[async_trait]
impl MetadataService for FileMetadata {
    async fn get_ring(&self) -> Result<RingRecord> {
        Ok(self.load().await?.current())
    }

    async fn get_peers(&self) -> Result<PeerDirectory> {
        Ok(self.load().await?.peers)
    }

    async fn set_ring(&self, candidate: RingRecord) -> Result<()> {
        let version = candidate.version;
        self.update(move |state| {
            check_successor(&state.current(), &candidate)?;
            state.rings.push(candidate);
            Ok(())
        })
        .await?;
        debug!(version, path = %self.path.display(), "committed ring record");
        Ok(())
    }

    async fn ring_history(&self) -> Result<Vec<RingRecord>> {
        Ok(self.load().await?.rings)
    }
}
