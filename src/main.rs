//! nebula - terminal chat client for the Nebula scenario agent.
//!
//! This is the main binary that loads configuration, opens the local
//! history store, and launches the TUI application.

use std::time::Duration;

use nebula_client::ChatClient;
use nebula_config::Config;
use nebula_store::{MessageStore, default_history_path};
use nebula_tui::{App, terminal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // History persistence is best-effort: without a data directory the
    // session simply stays in memory.
    let store = match default_history_path() {
        Ok(path) => MessageStore::open(path, config.history_cap),
        Err(_) => MessageStore::in_memory(config.history_cap),
    };

    let client = ChatClient::new(
        config.base_url.clone(),
        config.chat_path.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    // Install panic hook to restore terminal on panic
    terminal::install_panic_hook();

    let mut terminal = terminal::setup_terminal()?;

    let mut app = App::new(store, client);
    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if app.run() failed
    terminal::restore_terminal(&mut terminal)?;

    result
}
