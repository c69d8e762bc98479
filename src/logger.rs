//! Logging setup.

use log::LevelFilter;

/// Installs a global logger printing timestamped records to stderr.
///
/// Fails if a logger has already been installed.
pub fn setup_logger(level: LevelFilter) -> Result<(), String> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(|e| e.to_string())
}
