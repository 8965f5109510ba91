use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Installs the global fmt subscriber once per process.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. With `json` set
/// every event is emitted as a single JSON object, which is what log shippers
/// expect in production. Calling this again is a no-op, and an already
/// installed global subscriber (e.g. from a test harness) is left in place.
pub fn init_logger(service_name: &'static str, json: bool) {
    LOGGER_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let builder = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE);

        let installed = if json {
            builder.json().try_init().is_ok()
        } else {
            builder.try_init().is_ok()
        };

        if installed {
            tracing::info!(service = service_name, json, "logger initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logger("common-tests", false);
        init_logger("common-tests", true);
        assert!(LOGGER_INIT.get().is_some());
    }
}
