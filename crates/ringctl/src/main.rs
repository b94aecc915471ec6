//! CLI entry point for ringctl.

use clap::Parser;
use ringctl::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    config.init_logging();
    let output = config.run().await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
