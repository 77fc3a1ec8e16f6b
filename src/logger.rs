use std::str::FromStr;

use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install the terminal logger.
///
/// Quiets the noisy http stack below `warn` so request-level output comes
/// from this crate only.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    TermLogger::init(
        level,
        ConfigBuilder::default()
            .add_filter_ignore_str("hyper")
            .add_filter_ignore_str("reqwest")
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
}

/// Parse a level like `debug` or `WARN`, falling back to `Info`.
pub fn parse_level(raw: Option<&str>) -> LevelFilter {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return LevelFilter::Info;
    };
    match LevelFilter::from_str(raw) {
        Ok(level) => level,
        Err(_) => {
            eprintln!("unknown log level `{}`, using info", raw);
            LevelFilter::Info
        }
    }
}
