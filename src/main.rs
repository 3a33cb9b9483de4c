mod shutdown;
mod startup;

use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    // Load configuration first; it decides the log level
    let config = startup::load_config()?;

    // Initialize logging
    startup::init_logging(config.debug)?;

    info!("Starting {} v{}", config.app_name, config.app_version);

    // Start the calendar front end
    startup::start(config).await
}
