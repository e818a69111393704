//! Server configuration from command-line arguments and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use studio_core::history::{DEFAULT_CAPACITY, DEFAULT_PROTECTED_RECENT};
use studio_core::{BranchPolicy, HistoryConfig};

/// Default port for the studio server.
pub const DEFAULT_PORT: u16 = 4173;

/// Default timeout for generator requests, in seconds.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments for the studio server.
#[derive(Debug, Clone, Parser)]
#[command(name = "component-studio")]
#[command(about = "Component Studio local server")]
#[command(version)]
pub struct CliArgs {
    /// Port to listen on (localhost only)
    #[arg(long, env = "STUDIO_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory the revision history is persisted in; in-memory if unset
    #[arg(long, env = "STUDIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the AI component generator (e.g., <http://localhost:8787/api/ai>)
    #[arg(long, env = "STUDIO_AI_URL")]
    pub ai_url: Option<String>,

    /// Generator request timeout in seconds
    #[arg(long, env = "STUDIO_AI_TIMEOUT_SECS", default_value_t = DEFAULT_AI_TIMEOUT_SECS)]
    pub ai_timeout_secs: u64,

    /// Soft cap on stored revisions
    #[arg(long, env = "STUDIO_HISTORY_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub history_capacity: usize,

    /// What happens to undone revisions on a new edit: truncate or preserve
    #[arg(long, env = "STUDIO_BRANCH_POLICY", default_value_t = BranchPolicy::Truncate)]
    pub branch_policy: BranchPolicy,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port.
    pub port: u16,
    /// Persistence directory.
    pub data_dir: Option<PathBuf>,
    /// Generator base URL.
    pub ai_url: Option<String>,
    /// Generator request timeout.
    pub ai_timeout: Duration,
    /// Revision history sizing.
    pub history: HistoryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: None,
            ai_url: None,
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            history: HistoryConfig::default(),
        }
    }
}

impl From<CliArgs> for ServerConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            port: args.port,
            data_dir: args.data_dir,
            ai_url: args.ai_url.filter(|url| !url.trim().is_empty()),
            ai_timeout: Duration::from_secs(args.ai_timeout_secs),
            history: HistoryConfig {
                capacity: args.history_capacity,
                protected_recent: DEFAULT_PROTECTED_RECENT,
                branch_policy: args.branch_policy,
            },
        }
    }
}
