//! Subcommands.

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use ring_core::{Peer, PeerSelection, RingKind};
use ring_store::RingChange;

use crate::config::CliConfig;

/// Text to print on success.
pub type CommandResult = anyhow::Result<String>;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the peer directory.
    Peers,
    /// Manage peers in the directory.
    #[command(subcommand)]
    Peer(PeerCommand),
    /// Inspect or modify the ring of the cluster.
    #[command(subcommand)]
    Ring(RingCommand),
}

#[derive(Debug, Subcommand)]
pub enum PeerCommand {
    /// Add or replace a peer.
    Add {
        #[arg(long)]
        uuid: String,
        #[arg(long)]
        address: String,
        /// Free-form attribute, repeatable.
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        metadata: Vec<(String, String)>,
    },
}

#[derive(Debug, Subcommand)]
pub enum RingCommand {
    /// Print the installed ring.
    Get,
    /// Print every installed ring version.
    History,
    /// Apply a new ring to the cluster.
    Change(ChangeArgs),
    /// Print the peers responsible for a key, primary first.
    Locate { key: String },
}

#[derive(Debug, Args)]
pub struct ChangeArgs {
    /// Ring type: empty, single, mod or ketama.
    #[arg(long = "type", default_value = "single")]
    pub ring_type: String,

    /// UUIDs to incorporate in the ring.
    #[arg(long, value_delimiter = ',', conflicts_with = "all_peers")]
    pub uuids: Vec<String>,

    /// Use all known peers.
    #[arg(long)]
    pub all_peers: bool,

    /// Replication factor (mod and ketama only).
    #[arg(short = 'r', long = "replication", default_value_t = 2)]
    pub replication: usize,
}

impl ChangeArgs {
    pub fn to_change(&self) -> anyhow::Result<RingChange> {
        let kind: RingKind = self.ring_type.parse()?;
        let peers = if self.all_peers {
            PeerSelection::All
        } else {
            PeerSelection::Uuids(self.uuids.iter().map(|u| u.as_str().into()).collect())
        };
        Ok(RingChange::new(kind, peers, self.replication))
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}

impl Command {
    pub async fn run(&self, config: &CliConfig) -> CommandResult {
        match self {
            Command::Peers => {
                let directory = config
                    .ring_store()
                    .peer_directory()
                    .await
                    .context("couldn't get peer list")?;
                Ok(directory
                    .iter()
                    .map(|p| {
                        let mut line = format!("{}\t{}", p.id, p.address);
                        for (k, v) in &p.metadata {
                            line.push_str(&format!("\t{k}={v}"));
                        }
                        line
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Peer(PeerCommand::Add {
                uuid,
                address,
                metadata,
            }) => {
                if uuid.is_empty() || address.is_empty() {
                    bail!("peer needs a non-empty --uuid and --address");
                }
                let peer = metadata
                    .iter()
                    .fold(Peer::new(uuid.as_str(), address.as_str()), |p, (k, v)| {
                        p.with_metadata(k, v)
                    });
                config
                    .metadata()
                    .register_peer(peer)
                    .await
                    .context("couldn't register peer")?;
                Ok(format!("registered {uuid}"))
            }
            Command::Ring(cmd) => cmd.run(config).await,
        }
    }
}

impl RingCommand {
    pub async fn run(&self, config: &CliConfig) -> CommandResult {
        let store = config.ring_store();
        match self {
            RingCommand::Get => {
                let ring = store.current_ring().await.context("couldn't get ring")?;
                Ok(ring.describe())
            }
            RingCommand::History => {
                let history = store.history().await.context("couldn't get ring history")?;
                let mut lines = Vec::with_capacity(history.len());
                for record in history {
                    let kind = record.ring_kind()?;
                    lines.push(format!(
                        "v{}\t{}\treplication={}\tpeers={}",
                        record.version,
                        kind,
                        record.replication_factor,
                        record.peers.len()
                    ));
                }
                Ok(lines.join("\n"))
            }
            RingCommand::Change(args) => {
                let change = args.to_change()?;
                let ring = store
                    .change_ring(&change)
                    .await
                    .with_context(|| format!("couldn't set new {} ring", change.kind))?;
                Ok(ring.describe())
            }
            RingCommand::Locate { key } => {
                let ring = store.current_ring().await.context("couldn't get ring")?;
                Ok(ring
                    .locate(key)
                    .iter()
                    .map(|p| format!("{}\t{}", p.id, p.address))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ring_core::Error;

    fn cli(dir: &tempfile::TempDir, args: &[&str]) -> CliConfig {
        let path = dir.path().join("meta.json");
        let mut argv = vec!["ringctl", "--metadata", path.to_str().unwrap()];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    async fn seed(dir: &tempfile::TempDir) {
        for (uuid, addr) in [("A", "a:1"), ("B", "b:1"), ("C", "c:1")] {
            cli(dir, &["peer", "add", "--uuid", uuid, "--address", addr])
                .run()
                .await
                .unwrap();
        }
    }

    #[test]
    fn test_uuids_conflict_with_all_peers() {
        let res = CliConfig::try_parse_from([
            "ringctl", "ring", "change", "--uuids", "a", "--all-peers",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_change_defaults() {
        let config = CliConfig::try_parse_from(["ringctl", "ring", "change", "--uuids", "a,b"])
            .unwrap();
        let Command::Ring(RingCommand::Change(args)) = &config.command else {
            panic!("expected ring change");
        };
        let change = args.to_change().unwrap();
        assert_eq!(change.kind, RingKind::Single);
        assert_eq!(change.replication_factor, 2);
        assert_eq!(
            change.peers,
            PeerSelection::Uuids(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_unknown_type() {
        let config =
            CliConfig::try_parse_from(["ringctl", "ring", "change", "--type", "rendezvous"])
                .unwrap();
        let Command::Ring(RingCommand::Change(args)) = &config.command else {
            panic!("expected ring change");
        };
        let err = args.to_change().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnknownRingKind(_))
        ));
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("zone=eu-1").unwrap(),
            ("zone".to_string(), "eu-1".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[tokio::test]
    async fn test_change_then_get_and_locate() {
        let dir = tempfile::tempdir().unwrap();
        seed(&dir).await;

        let out = cli(
            &dir,
            &["ring", "change", "--type", "ketama", "--all-peers", "-r", "2"],
        )
        .run()
        .await
        .unwrap();
        assert!(out.starts_with("Ring: ketama\nVersion: 1"));

        let got = cli(&dir, &["ring", "get"]).run().await.unwrap();
        assert_eq!(got, out);

        let located = cli(&dir, &["ring", "locate", "key1"]).run().await.unwrap();
        assert_eq!(located.lines().count(), 2);

        let history = cli(&dir, &["ring", "history"]).run().await.unwrap();
        assert_eq!(history.lines().count(), 2);
        assert!(history.lines().nth(1).unwrap().starts_with("v1\tketama"));
    }

    #[tokio::test]
    async fn test_failed_change_reports_precondition() {
        let dir = tempfile::tempdir().unwrap();
        seed(&dir).await;

        let err = cli(&dir, &["ring", "change", "--type", "single", "--all-peers"])
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidPeerCount { count: 3, .. })
        ));

        let got = cli(&dir, &["ring", "get"]).run().await.unwrap();
        assert!(got.starts_with("Ring: empty\nVersion: 0"));
    }

    #[tokio::test]
    async fn test_peers_listing() {
        let dir = tempfile::tempdir().unwrap();
        cli(
            &dir,
            &["peer", "add", "--uuid", "A", "--address", "a:1", "--meta", "zone=eu"],
        )
        .run()
        .await
        .unwrap();
        let out = cli(&dir, &["peers"]).run().await.unwrap();
        assert_eq!(out, "A\ta:1\tzone=eu");
    }
}
