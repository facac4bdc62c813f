use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise both crates log at `default_level`.
pub fn init_logging(default_level: &str) {
    let level = default_level.to_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("engace={level},engace_api={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
