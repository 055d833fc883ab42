use anyhow::Context as _;
use eddy::{App, Config, config::CONFIG_FILE};
use eddy_tui::TuiBackend;

fn main() -> anyhow::Result<()> {
    let config = Config::load_or_default(CONFIG_FILE)
        .with_context(|| format!("loading {CONFIG_FILE}"))?;
    let backend = TuiBackend::stdout().context("opening the terminal")?;
    App::new(config)
        .run(backend, eddy_demo::game())
        .context("running tic-tac-toe")?;
    tracing::info!("bye");
    Ok(())
}
