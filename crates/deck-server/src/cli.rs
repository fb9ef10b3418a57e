use clap::Parser;

/// Command-line flags for the `deckd` binary.
///
/// Flags override the corresponding values from `deck-config`.
#[derive(Debug, Parser)]
#[command(name = "deckd", version, about = "focusdeck - tasks, chunks, and focus sessions")]
pub struct Cli {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Database file path (overrides database.path)
    #[arg(long)]
    pub db: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply flag overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut deck_config::DeckConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db) = &self.db {
            config.database.path.clone_from(db);
        }
    }
}
