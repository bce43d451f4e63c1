use anyhow::Result;
use log::{LevelFilter, Record};
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::{self, Encode, pattern::PatternEncoder, writer::simple::SimpleWriter},
};
use std::io::Write;
use std::path::Path;

/// Pattern for the run log: timestamp and level before every message.
pub const FILE_LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";

/// Pattern for the console: the message only, styling comes from `terminal`.
pub const CONSOLE_LOG_PATTERN: &str = "{m}{n}";

/// Pattern encoder whose output has ANSI escape sequences removed.
///
/// Terminal helpers style their messages before logging them, so the run
/// log needs the styling taken back out.
#[derive(Debug)]
pub struct PlainTextEncoder {
    inner: PatternEncoder,
}

impl PlainTextEncoder {
    pub fn new(pattern: &str) -> Self {
        Self {
            inner: PatternEncoder::new(pattern),
        }
    }
}

impl Encode for PlainTextEncoder {
    fn encode(&self, w: &mut dyn encode::Write, record: &Record) -> Result<()> {
        let mut styled = SimpleWriter(Vec::new());
        self.inner.encode(&mut styled, record)?;
        w.write_all(&strip_ansi_escapes::strip(&styled.0))?;
        Ok(())
    }
}

/// File appender for the run log, creating its directory if needed.
pub fn run_log_appender(log_file: &Path) -> Result<FileAppender> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(FileAppender::builder()
        .encoder(Box::new(PlainTextEncoder::new(FILE_LOG_PATTERN)))
        .build(log_file)?)
}

/// Builds the log4rs configuration without installing it.
pub fn build_logging_config(log_file: Option<&Path>, log_level: LevelFilter) -> Result<Config> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_LOG_PATTERN)))
        .build();

    let mut builder =
        Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(log_file) = log_file {
        let file_appender = run_log_appender(log_file)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    Ok(builder.build(root.build(log_level))?)
}

/// Installs console logging and, when `log_file` is given, a file log.
///
/// Can only succeed once per process.
pub fn setup_logging(log_file: Option<&Path>, log_level: LevelFilter) -> Result<()> {
    let config = build_logging_config(log_file, log_level)?;
    log4rs::init_config(config)?;
    Ok(())
}
