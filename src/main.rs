use choreboard::commands::Cli;
use choreboard::libs::error::{exit_codes, ChoreError};
use choreboard::libs::messages::macros::DEBUG_ENV;
use choreboard::msg_error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    if let Err(e) = Cli::menu().await {
        let code = match e.downcast_ref::<ChoreError>() {
            Some(chore) => {
                msg_error!(chore);
                chore.exit_code()
            }
            None => {
                eprintln!("{:#}", e);
                exit_codes::FAILURE
            }
        };
        std::process::exit(code);
    }
}

/// Tracing is opt-in: `RUST_LOG` wins, `CHOREBOARD_DEBUG` alone means debug
/// output for this crate, otherwise nothing is logged.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .or_else(|| std::env::var(DEBUG_ENV).ok().map(|_| EnvFilter::new("choreboard=debug")))
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
