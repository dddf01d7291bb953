//! Logging to stderr and, when possible, to a file with everything down to trace level.
use std::{
    env,
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::{info, LevelFilter, Log, Metadata, Record};

struct Tee {
    loggers: Vec<env_logger::Logger>,
}

impl Log for Tee {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.loggers.iter().any(|logger| logger.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        for logger in self.loggers.iter().filter(|l| l.matches(record)) {
            logger.log(record);
        }
    }

    fn flush(&self) {
        self.loggers.iter().for_each(Log::flush);
    }
}

/// Tells the user where the full log is, unless disarmed after a successful run.
pub struct Guard {
    file: Option<PathBuf>,
}

impl Guard {
    pub fn disarm(&mut self) {
        if let Some(file) = self.file.take() {
            info!("Full log stored in {file:?}");
        }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        if let Some(file) = self.file.as_ref() {
            eprintln!("Full log stored in {file:?}");
        }
    }
}

fn file_path() -> Option<PathBuf> {
    let current_exe = env::current_exe().ok()?;
    let name = current_exe.file_stem()?.to_str()?;
    Some(env::temp_dir().join(name).with_extension("log"))
}

fn file_logger(path: &Path) -> anyhow::Result<env_logger::Logger> {
    let file = File::create(path).with_context(|| format!("Could not create {path:?}"))?;
    Ok(env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .build())
}

fn stderr_logger() -> env_logger::Logger {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .build()
}

/// Combine the stderr logger with a file logger writing to `path`, if one can be created.
///
/// Returns the path of the log file actually in use.
fn tee(path: Option<PathBuf>) -> (Tee, Option<PathBuf>) {
    let mut loggers = vec![stderr_logger()];
    let file = path.and_then(|path| match file_logger(&path) {
        Ok(logger) => {
            loggers.push(logger);
            Some(path)
        }
        Err(e) => {
            eprintln!("Logging to stderr only: {e:?}");
            None
        }
    });
    (Tee { loggers }, file)
}

/// Install the global logger.
///
/// The stderr level defaults to `warn` and can be changed with `RUST_LOG`.
pub fn init() -> anyhow::Result<Guard> {
    let (tee, file) = tee(file_path());
    let max_level = tee
        .loggers
        .iter()
        .map(env_logger::Logger::filter)
        .max()
        .unwrap_or(LevelFilter::Off);
    log::set_boxed_logger(Box::new(tee)).context("Logger already installed")?;
    log::set_max_level(max_level);

    Ok(Guard { file })
}
