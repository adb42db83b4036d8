use log::LevelFilter;

/// Initialise diagnostic logging on stderr.
///
/// Command output and progress lines are printed by the console reporter;
/// this only carries scheduler diagnostics.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
