const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "info";

/// Sets up logging. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            VERBOSE_FILTER.to_string()
        } else {
            DEFAULT_FILTER.to_string()
        }
    });
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
    log::debug!("Logging initialized with filter {filters}");
}
