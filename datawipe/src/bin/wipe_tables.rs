//! Empties every application table and reseeds the public credential.
//!
//! Destructive and unconfirmed. Stop the application services first.

use clap::Parser;
use datawipe::{FINISH_LINES, START_BANNER, WipeTablesCli, progress_line};
use datawipe_core::{Result, init_logging};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = WipeTablesCli::parse();
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = cli.postgres.to_config()?;
    let wiper = cli.tables.wiper(&config);
    let quiet = cli.global.quiet;

    if !quiet {
        println!("{}", START_BANNER);
    }
    info!(target_db = %config, preserved = wiper.migration_table(), "Starting table wipe");

    let report = wiper
        .wipe_with(|event| {
            if let Some(line) = progress_line(&event)
                && !quiet
            {
                println!("{}", line);
            }
        })
        .await
        .map_err(|e| {
            error!("Table wipe failed, nothing was committed: {}", e);
            e
        })?;

    info!(
        tables = report.wiped.len(),
        rows = report.rows_deleted(),
        seed = ?report.seed,
        "Table wipe finished"
    );

    if !quiet {
        for line in FINISH_LINES {
            println!("{}", line);
        }
    }

    Ok(())
}
