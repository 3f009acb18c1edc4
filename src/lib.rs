pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod filters;
pub mod gateway;
pub mod grouping;
pub mod models;
pub mod scope;
pub mod store;

pub use client::{AutoConfirm, ClientCore, ConfirmPrompt};
pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};

/// Installs the process-wide tracing subscriber: JSON lines to stderr,
/// `RUST_LOG`-style filtering, `info` by default.
pub fn init_tracing() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| error.to_string())
}
