use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Install a file logger writing to ~/.local/share/fsh/fsh.log.
/// Best-effort: failures are silently ignored (logging must never block the shell).
pub fn init(level: &str) {
    let filter = parse_level(level);
    if filter == LevelFilter::Off {
        return;
    }
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let log_dir = std::path::Path::new(&home).join(".local/share/fsh");
    let _ = std::fs::create_dir_all(&log_dir);

    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("fsh.log"))
    else {
        return;
    };

    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = WriteLogger::init(filter, config, file);
}

/// Map a config level name to a filter; unknown names fall back to `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Compact single-line form of an input line for log records.
pub fn oneline(text: &str) -> String {
    let flat = text.replace('\n', "; ");
    flat.chars().take(200).collect()
}
