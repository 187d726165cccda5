use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Build the logging config: console always, plus `{dir}/statbadge.log` rolled
/// at 10 MiB keeping `retention` files when `dir` is given.
///
/// # Errors
/// Returns an error if the log directory or file appender cannot be created.
pub fn build_config(
    dir: Option<&Path>,
    level: &str,
    retention: u32,
) -> Result<Config, Box<dyn std::error::Error>> {
    let lvl = parse_level(level);
    let console = ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(PATTERN))).build();
    let mut builder = Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)?;
        let roller = FixedWindowRoller::builder()
            .build(&format!("{}", dir.join("statbadge.{}.log").display()), retention.max(1))?;
        let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
        let file = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build(dir.join("statbadge.log"), Box::new(policy))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    // Dependencies are chatty at debug; keep them at warn unless tracing
    let deps = if lvl >= LevelFilter::Trace { lvl } else { LevelFilter::Warn };
    for target in ["hyper", "hyper_util", "reqwest", "rustls"] {
        builder = builder.logger(Logger::builder().build(target, deps));
    }

    Ok(builder.build(root.build(lvl))?)
}

/// Configure logging globally for the process. A second call is a no-op.
///
/// # Errors
/// Returns an error if the configuration cannot be built.
pub fn configure_logging(
    dir: Option<&Path>,
    level: &str,
    retention: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(dir, level, retention)?;
    let _ = log4rs::init_config(config);
    Ok(())
}
