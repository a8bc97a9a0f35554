use pj::presentation::cli::CliApp;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let app = CliApp::new();
    init_tracing(app.verbose());

    app.run().await
}

/// Log to stderr; `RUST_LOG` overrides the level picked from `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "pj=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
