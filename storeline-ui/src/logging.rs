//! Tracing bootstrap for binaries.

/// Directives used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "error,storeline_ui=info,storeline_components=info";

/// Installs a global `tracing` subscriber.
///
/// Reads `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVES`]. Calling it more
/// than once is harmless; only the first call installs a subscriber.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_DIRECTIVES);
}

/// Like [`init_tracing`] with caller-chosen fallback directives.
pub fn init_tracing_with(fallback: &str) {
    #[cfg(target_os = "android")]
    {
        let _ = fallback;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_max_level(tracing::Level::INFO)
            .try_init();
    }

    #[cfg(not(target_os = "android"))]
    {
        let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match tracing_subscriber::EnvFilter::try_new(fallback) {
                Ok(filter) => filter,
                Err(_) => tracing_subscriber::EnvFilter::new("error"),
            },
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    }
}
