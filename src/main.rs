// Entrypoint for the uploader.
// - Keeps `main` small: build the configuration and client, then run the flow.
// - Returns `anyhow::Result` so start-up errors exit non-zero with context.

use avbin_upload::{
    api::GoogleCodeClient,
    config::UploadConfig,
    ui::{run, RunStatus, TerminalPrompt, Transcript},
};
use crossterm::tty::IsTty;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr and stay quiet unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = UploadConfig::from_env()?;
    let host = GoogleCodeClient::from_config(&config)?;

    let stdout = std::io::stdout();
    let color = stdout.is_tty();
    let mut transcript = Transcript::new(stdout.lock(), color);

    match run(&config, &host, &mut TerminalPrompt, &mut transcript)? {
        RunStatus::Completed(_) => Ok(()),
        RunStatus::Aborted => std::process::exit(1),
    }
}
