use log::LevelFilter;

/// Initialize logging using env_logger.
/// By default, this reads the RUST_LOG environment variable for filtering
/// and falls back to `info`, e.g. `RUST_LOG=ftp_bridge=debug ftp-bridge ls --profile prod /`
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}
