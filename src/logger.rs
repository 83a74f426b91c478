use log::LevelFilter;

/// Log to stderr at the given level unless RUST_LOG overrides it per module
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
