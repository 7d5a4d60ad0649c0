//! Binary entry point: resolve configuration, start logging, open the store,
//! make sure the tables exist, then hand the connection to the UI for the rest
//! of the session.
use anyhow::Context;
use clap::Parser;
use event_planner::logging::init_logging;
use event_planner::{ensure_schema, open_store, run_app, App, Cli, Config};
use log::info;

/// A store or schema failure stops here, before the UI starts, so no write is
/// ever attempted against missing tables.
fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    let _logger = init_logging(config.log_level, &config.log_dir)?;
    info!(
        "event=session_start module=main status=ok references={:?}",
        config.reference_policy
    );

    let conn = open_store(&config.db_path, config.reference_policy)
        .context("could not open the event planner database")?;
    ensure_schema(&conn).context("could not prepare the event planner tables")?;

    let mut app = App::new(conn)?;
    let result = run_app(&mut app);
    app.close()?;
    info!("event=session_end module=main status=ok");
    result
}
