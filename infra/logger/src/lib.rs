//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for Bindery binaries.
//!
//! Output goes to one or both sinks:
//! * the console: compact and coloured, always on stderr so that command output on stdout
//!   stays machine-readable;
//! * a rolling file directory written by a background worker, as plain text or JSON lines.
//!
//! Both share one [`EnvFilter`]: a default level plus optional module directives. `RUST_LOG`
//! takes over when no directives are configured.
//!
//! Use the type-state [`LoggerBuilder`] from code, or [`Logger::from_config`] with the
//! `[logging]` section of the application config.
//!
//! ```rust
//! # use bindery_logger::{LevelFilter, Logger};
//! let _logger = Logger::builder()
//!     .name("bindery")
//!     .level(LevelFilter::DEBUG)
//!     .directives("bindery_customization=trace")
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use bindery_domain::config::LoggingConfig;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Line format of the file sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug)]
struct FileSink {
    directory: PathBuf,
    rotation: Rotation,
    max_files: usize,
    format: FileFormat,
}

#[derive(Debug)]
struct Settings {
    console: bool,
    level: LevelFilter,
    directives: Option<String>,
    file: Option<FileSink>,
}

/// Builder state: no name given yet.
#[derive(Debug)]
pub struct Unnamed;
/// Builder state: named, ready to [`init`](LoggerBuilder::init).
#[derive(Debug)]
pub struct Named(String);
/// Builder state: console output only.
#[derive(Debug)]
pub struct ConsoleOnly;
/// Builder state: a file directory was given and file options are unlocked.
#[derive(Debug)]
pub struct WithFiles;

/// Type-state builder for the global subscriber.
///
/// A name is required before [`init`](Self::init); it prefixes rolling log files. File-only
/// options appear after [`files`](Self::files).
#[derive(Debug)]
#[must_use = "a logger builder does nothing until `init` is called"]
pub struct LoggerBuilder<N = Unnamed, F = ConsoleOnly> {
    settings: Settings,
    name: N,
    sink: PhantomData<F>,
}

impl<F> LoggerBuilder<Unnamed, F> {
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), sink: PhantomData }
    }
}

impl<N, F> LoggerBuilder<N, F> {
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Module directives such as `bindery_customization=debug,config=warn`.
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.settings.directives = Some(directives.into());
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }
}

impl<N> LoggerBuilder<N, ConsoleOnly> {
    /// Adds a rolling file sink in `directory` (created on init), rotated daily.
    pub fn files(self, directory: impl Into<PathBuf>) -> LoggerBuilder<N, WithFiles> {
        let mut settings = self.settings;
        settings.file = Some(FileSink {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            max_files: LoggingConfig::default().max_files,
            format: FileFormat::Plain,
        });
        LoggerBuilder { settings, name: self.name, sink: PhantomData }
    }
}

impl<N> LoggerBuilder<N, WithFiles> {
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = &mut self.settings.file {
            file.rotation = rotation;
        }
        self
    }

    pub fn max_files(mut self, max_files: usize) -> Self {
        if let Some(file) = &mut self.settings.file {
            file.max_files = max_files;
        }
        self
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        if let Some(file) = &mut self.settings.file {
            file.format = format;
        }
        self
    }
}

impl<F> LoggerBuilder<Named, F> {
    /// Installs the subscriber.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, bad directives, zero
    ///   retained files, or when both sinks are disabled.
    /// * [`LoggerError::Directory`] / [`LoggerError::Appender`] when the file sink cannot
    ///   be opened.
    /// * [`LoggerError::Subscriber`] when a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        settings.check(&name)?;

        let filter = settings.env_filter()?;
        let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
        if settings.console {
            layers.push(fmt::layer().compact().with_writer(std::io::stderr).boxed());
        }

        let guard = match &settings.file {
            Some(sink) => {
                let (layer, guard) = file_layer(&name, sink)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        Ok(Logger { guard })
    }
}

impl Settings {
    fn check(&self, name: &str) -> Result<(), LoggerError> {
        let problem = if name.trim().is_empty() {
            Some("logger name cannot be empty")
        } else if !self.console && self.file.is_none() {
            Some("both console and file output are disabled")
        } else if self.file.as_ref().is_some_and(|file| file.max_files == 0) {
            Some("max_files must be greater than zero")
        } else {
            None
        };

        match problem {
            Some(message) => {
                Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
            },
            None => Ok(()),
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        let Some(directives) = &self.directives else {
            return Ok(builder.from_env_lossy());
        };
        builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("invalid directives '{directives}': {e}").into(),
            context: None,
        })
    }
}

fn file_layer(name: &str, sink: &FileSink) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(&sink.directory)
        .context(format!("Cannot create {}", sink.directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(sink.rotation.clone())
        .filename_prefix(name)
        .filename_suffix("log")
        .max_log_files(sink.max_files)
        .build(&sink.directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = match sink.format {
        FileFormat::Plain => layer.boxed(),
        FileFormat::Json => layer.json().boxed(),
    };
    Ok((layer, guard))
}

/// Handle to the installed subscriber.
///
/// Owns the file worker. Buffered lines are flushed when it is dropped, so keep it alive
/// until the program exits.
#[derive(Debug)]
#[must_use = "dropping the logger stops the file writer"]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            settings: Settings {
                console: true,
                level: LevelFilter::INFO,
                directives: None,
                file: None,
            },
            name: Unnamed,
            sink: PhantomData,
        }
    }

    /// Installs the subscriber described by a `[logging]` config section.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an unknown level name, plus everything
    /// [`LoggerBuilder::init`] returns.
    pub fn from_config(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        let level = parse_level(&config.level)?;
        let mut builder = Self::builder().name(name).level(level).console(config.console);
        if let Some(directives) = &config.filter {
            builder = builder.directives(directives.as_str());
        }

        let Some(directory) = &config.directory else {
            return builder.init();
        };
        let format = if config.json { FileFormat::Json } else { FileFormat::Plain };
        builder.files(directory).max_files(config.max_files).format(format).init()
    }

    /// True when a file sink is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("unknown log level '{level}'").into(),
        context: None,
    })
}
