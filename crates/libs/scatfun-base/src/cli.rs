//! Command line helpers shared by the scatfun binaries.

use log::LevelFilter;
use std::time::{Duration, SystemTime};

/// Parses the arguments, returns the arguments and the launch time.
pub fn parse_args<T: clap::Parser>() -> (T, SystemTime) {
    let args = T::parse();
    (args, SystemTime::now())
}

/// Logs the launch of a program; call once logging has been set up.
pub fn log_launch(name: &str, launch_time: SystemTime) {
    log::info!(
        "{} launched at {} on {}.",
        name,
        chrono::DateTime::<chrono::Utc>::from(launch_time),
        std::env::consts::OS
    );
}

/// Initialises logging.
///
/// # Arguments
///
/// * `timestamp` - If set, every record is prefixed with the time elapsed
///   since this instant.
/// * `log_level` - Verbosity of the program, see [`log_filter_from_level`].
pub fn setup_logging(timestamp: Option<SystemTime>, log_level: u8) {
    use std::io::Write;
    env_logger::builder()
        .format(move |buf, record| {
            let module = record
                .module_path()
                .and_then(|path| path.split("::").next())
                .unwrap_or("?");
            if let Some(elapsed) = timestamp.and_then(|t| t.elapsed().ok()) {
                write!(buf, "{} ", format_elapsed(elapsed))?;
            }
            writeln!(buf, "{:5} [{}]: {}", record.level(), module, record.args())
        })
        .filter_level(log_filter_from_level(log_level))
        .init();
}

/// Formats a duration as `h:m:s.mmm`.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{}:{}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_millis()
    )
}

/// Converts a log level to a log filter.
pub fn log_filter_from_level(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_filters() {
        assert_eq!(log_filter_from_level(0), LevelFilter::Error);
        assert_eq!(log_filter_from_level(1), LevelFilter::Warn);
        assert_eq!(log_filter_from_level(3), LevelFilter::Debug);
        assert_eq!(log_filter_from_level(200), LevelFilter::Trace);
    }

    #[test]
    fn elapsed_time_prefix() {
        assert_eq!(format_elapsed(Duration::from_millis(7)), "0:0:0.007");
        assert_eq!(
            format_elapsed(Duration::from_millis(((2 * 60 + 5) * 60 + 9) * 1000 + 250)),
            "2:5:9.250"
        );
    }
}
