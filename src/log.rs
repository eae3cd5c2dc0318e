// src/log.rs
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "foodcli=info";
const DEBUG_FILTER: &str = "foodcli=debug,reqwest=debug";

/// Install the stderr subscriber. `RUST_LOG` wins over the `--debug` flag.
/// Safe to call more than once; later calls are ignored.
pub fn init(debug: bool) {
    let fallback = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init();
}
