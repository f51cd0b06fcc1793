//! Deletes every document from the search index.
//!
//! Silent on success; failures are logged and exit non-zero.

use clap::Parser;
use datawipe::WipeIndexCli;
use datawipe_core::{IndexWiper, Result, init_logging};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = WipeIndexCli::parse();
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = cli.index.to_config()?;
    info!(
        endpoint = %config.document_endpoint,
        cluster = %config.index_name,
        "Wiping search index"
    );

    IndexWiper::new(&config)?.wipe().await.map_err(|e| {
        error!("Index wipe failed: {}", e);
        e
    })?;

    info!("Search index wiped");
    Ok(())
}
