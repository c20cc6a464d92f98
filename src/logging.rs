use anyhow::Context;
use log::LevelFilter;
use log4rs::Handle;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// Logs only go to stderr, stdout is reserved for the prompts
pub fn init_logging(level: LevelFilter) -> anyhow::Result<Handle> {
    let config = build_config(level)?;

    // Use this to change log levels at runtime.
    let handle = log4rs::init_config(config).context("Failed to init_config")?;

    Ok(handle)
}

fn build_config(level: LevelFilter) -> anyhow::Result<Config> {
    // Pattern: https://docs.rs/log4rs/*/log4rs/encode/pattern/index.html
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}{n}",
        )))
        .build();

    Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(Root::builder().appender("stderr").build(level))
        .context("Failed to configure logging")
}
