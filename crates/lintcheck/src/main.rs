//! lintcheck CLI entry point

// CLI binary needs to output to stderr before tracing is up
#![allow(clippy::print_stderr)]

use lintcheck::cli::{self, Cli, EXIT_FAILURE, render_error};
use lintcheck::tracing::{correlation_id, init_tracing};

fn main() {
    // Tracing may be unusable during a panic.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            std::process::exit(EXIT_FAILURE);
        }
    };

    let exit_code = rt.block_on(run(cli));
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> i32 {
    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("Warning: {e}");
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            render_error(e);
            return EXIT_FAILURE;
        }
    };

    match lintcheck::execute(&config).await {
        Ok(outcome) => {
            tracing::info!(
                correlation_id = %correlation_id(),
                check_run_id = outcome.check_run_id,
                exit_code = outcome.exit_code,
                "Lint run finished"
            );
            outcome.exit_code
        }
        Err(e) => {
            tracing::error!(correlation_id = %correlation_id(), error = %e, "Lint run failed");
            render_error(e);
            EXIT_FAILURE
        }
    }
}
