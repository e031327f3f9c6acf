//! Tableq CLI - shared table waitlist
//!
//! Binary name: `tableq`

use std::process;

use tableq::cli::handlers::{format_error, run_cli};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run_cli().await {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {}", format_error(&err));
        }

        let code = err
            .downcast_ref::<tableq_core::Error>()
            .map_or(1, tableq_core::Error::exit_code);

        #[allow(clippy::exit)]
        process::exit(code);
    }
}
