//! Logging setup.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

/// Installs a `fmt` subscriber for the roomroute crates and `binary_name`.
///
/// `RUST_LOG` overrides `default_level` when set. Returns an error if a
/// global subscriber is already installed.
///
/// ```no_run
/// roomroute::logging::init("room_router", "debug").ok();
/// ```
pub fn init(binary_name: &str, default_level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(binary_name, default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

fn default_directives(binary_name: &str, level: &str) -> String {
    let binary = binary_name.replace('-', "_");
    [
        "roomroute",
        "roomroute_types",
        "roomroute_directory",
        "roomroute_placement",
        binary.as_str(),
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",")
}
