use env_logger::WriteStyle;
use log::LevelFilter;
use std::io::Write;

/// Installs an `env_logger` backend that prefixes every line with `[JOLT | LEVEL]`.
///
/// `RUST_LOG` still overrides the default `Info` filter. Returns an error instead of
/// panicking if a logger was already installed, so tests may call this repeatedly.
pub fn try_init() -> Result<(), log::SetLoggerError> {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "[JOLT | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Auto)
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .try_init()
}
