use crate::shutdown;
use redwood_calendar::commands::{dispatch, Command, CommandContext, Reply};
use redwood_calendar::components::{CalendarController, ScheduleServiceHandle};
use redwood_calendar::config::Config;
use redwood_calendar::error::Error;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging(debug: bool) -> miette::Result<()> {
    let default_filter = if debug {
        "debug,reqwest=info,hyper=info"
    } else {
        "info,reqwest=warn,hyper=warn"
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            eprintln!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Start the schedule service actor and run the interactive calendar
pub async fn start(config: Arc<Config>) -> miette::Result<()> {
    let service = ScheduleServiceHandle::new(Arc::clone(&config))?;

    // Create shutdown channel
    let (shutdown_send, mut shutdown_recv) = oneshot::channel();

    // Spawn signal handler task
    let shutdown_service = service.clone();
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_service).await;
    });

    let controller = CalendarController::new(Arc::clone(&config), service.clone());
    let mut ctx = CommandContext::new(controller);

    // Initial load; the calendar still opens on failure
    if let Err(e) = ctx.controller.reload().await {
        println!("Could not load schedules: {}", e);
    }
    run_command(&mut ctx, Command::Show).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let command = match Command::parse(&line) {
                            Ok(command) => command,
                            Err(e) => {
                                println!("{}", e);
                                continue;
                            }
                        };
                        if !run_command(&mut ctx, command).await {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Input closed");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            _ = &mut shutdown_recv => {
                info!("Received shutdown signal, closing calendar...");
                return Ok(());
            }
        }
    }

    if let Err(e) = service.shutdown().await {
        warn!("Error shutting down schedule service actor: {:?}", e);
    }
    info!("Calendar closed");
    Ok(())
}

/// Run one command and print its output. Returns false when the user quits.
async fn run_command(ctx: &mut CommandContext<ScheduleServiceHandle>, command: Command) -> bool {
    match dispatch(ctx, command).await {
        Ok(Reply::Output(text)) => {
            println!("{}", text);
            true
        }
        Ok(Reply::Quit) => false,
        Err(e) => {
            error!("Command failed: {}", e);
            println!("{}", e);
            true
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
