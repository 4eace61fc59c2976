use anyhow::Context;
use clap::Parser;
use tracing::debug;

use taxplan_cli::app::{self, App};
use taxplan_cli::cli::Cli;
use taxplan_cli::config::AppConfig;
use taxplan_cli::logging;
use taxplan_core::PlanEditor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.global.config.as_deref())?.with_overrides(&cli.global);
    logging::init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "configuration loaded");

    let registry = app::build_registry();
    let repo = registry
        .create(&config.database)
        .await
        .with_context(|| format!("opening {} storage", config.database.backend))?;

    let app = App::new(&*repo, PlanEditor::default(), config.default_year);
    let output = app.run(cli.command).await?;
    println!("{output}");

    Ok(())
}
