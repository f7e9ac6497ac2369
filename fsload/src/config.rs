//! Configuration for the load generator.
//!
//! Configuration can be loaded from multiple sources with the following precedence (highest to
//! lowest):
//!
//! 1. Command-line flags
//! 2. Environment variables (prefixed with `FSLOAD__`)
//! 3. YAML configuration file (specified via `-c` or `--config` flag)
//! 4. Defaults
//!
//! See [`Config`] for a description of all configuration fields and their defaults.
//!
//! # Environment Variables
//!
//! Environment variables use `FSLOAD__` as a prefix and double underscores (`__`) to denote nested
//! configuration structures. For example:
//!
//! - `FSLOAD__PATH=/mnt/nfs/load` sets the work target
//! - `FSLOAD__NUM_WRITERS=16` sets the number of writer tasks
//! - `FSLOAD__LOGGING__LEVEL=debug` sets the log level
//!
//! # YAML Configuration File
//!
//! The above configuration in YAML format would look like this:
//!
//! ```yaml
//! path: /mnt/nfs/load
//! num_writers: 16
//!
//! logging:
//!   level: debug
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread::available_parallelism;

use anyhow::{Result, bail};
use bytesize::ByteSize;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::workload::{DEFAULT_FILE_SIZE, Workload};

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "FSLOAD__";

/// Runtime configuration for the Tokio async runtime.
///
/// Used in: [`Config::runtime`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Runtime {
    /// Number of worker threads for the runtime.
    ///
    /// Filesystem calls run on Tokio's blocking pool, so this mostly bounds the CPU spent on
    /// generating random content.
    ///
    /// # Default
    ///
    /// Defaults to the available parallelism of the host machine.
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__RUNTIME__WORKER_THREADS`
    pub worker_threads: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            worker_threads: available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted. The format can be explicitly specified or
/// auto-detected based on whether output is to a TTY.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Auto detect the best format.
    ///
    /// This chooses [`LogFormat::Pretty`] for TTY, otherwise [`LogFormat::Simplified`].
    Auto,

    /// Pretty printing with colors.
    Pretty,

    /// Simplified plain text output.
    ///
    /// ```text
    /// 2020-12-04T12:10:32.123Z  INFO writer task 3 finished
    /// ```
    Simplified,

    /// Dump out JSON lines.
    Json,
}

/// The logging format parse error.
#[derive(Clone, Debug)]
pub struct FormatParseError(String);

impl fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"error parsing "{}" as format: expected one of "auto", "pretty", "simplified", "json""#,
            self.0
        )
    }
}

impl std::str::FromStr for LogFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let result = match s {
            s if s.eq_ignore_ascii_case("auto") => LogFormat::Auto,
            s if s.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            s if s.eq_ignore_ascii_case("simplified") => LogFormat::Simplified,
            s if s.eq_ignore_ascii_case("json") => LogFormat::Json,
            s => return Err(FormatParseError(s.into())),
        };

        Ok(result)
    }
}

impl std::error::Error for FormatParseError {}

mod display_fromstr {
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: std::fmt::Display,
    {
        serializer.collect_str(&value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: std::str::FromStr,
        <T as std::str::FromStr>::Err: std::fmt::Display,
    {
        use serde::Deserialize;
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Logging configuration.
///
/// Controls the verbosity and format of log output. Logs are written to stdout, since they are
/// the only report a run produces.
///
/// Used in: [`Config::logging`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Minimum log level to output.
    ///
    /// Valid levels in increasing severity: TRACE, DEBUG, INFO, WARN, ERROR, OFF. The `RUST_LOG`
    /// environment variable takes precedence if set.
    ///
    /// **Important**: `TRACE` logs every created file and will slow down large runs.
    ///
    /// # Default
    ///
    /// `INFO`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__LOGGING__LEVEL`
    #[serde(with = "display_fromstr")]
    pub level: LevelFilter,

    /// Log output format.
    ///
    /// See [`LogFormat`] for available options.
    ///
    /// # Default
    ///
    /// `Auto` (pretty for TTY, simplified otherwise)
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__LOGGING__FORMAT`
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Auto,
        }
    }
}

/// Main configuration struct for the load generator.
///
/// Configuration is loaded with the following precedence (highest to lowest):
/// 1. Command-line flags
/// 2. Environment variables (prefixed with `FSLOAD__`)
/// 3. YAML configuration file (if provided via `-c` flag)
/// 4. Default values
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Base directory that all tasks operate on.
    ///
    /// Created if missing. It is not required to be empty; with `delete_files` enabled, all of its
    /// contents are removed at the end of a run, including files that were there before.
    ///
    /// This has no default and must be supplied.
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__PATH`
    pub path: PathBuf,

    /// Number of writer tasks to spawn.
    ///
    /// # Default
    ///
    /// `0`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__NUM_WRITERS`
    pub num_writers: usize,

    /// Number of reader tasks to spawn.
    ///
    /// # Default
    ///
    /// `0`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__NUM_READERS`
    pub num_readers: usize,

    /// Size of every written file.
    ///
    /// Accepts plain byte counts as well as human-readable sizes such as `4KiB` or `1 MB`.
    ///
    /// # Default
    ///
    /// `1MiB`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__FILE_SIZE`
    pub file_size: ByteSize,

    /// Number of files each writer creates.
    ///
    /// # Default
    ///
    /// `1`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__FILES_PER_THREAD`
    pub files_per_thread: usize,

    /// Number of recursive listings each reader performs.
    ///
    /// # Default
    ///
    /// `1`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__READS_PER_THREAD`
    pub reads_per_thread: usize,

    /// Removes everything below `path` after all writers and readers have finished.
    ///
    /// # Default
    ///
    /// `false`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__DELETE_FILES`
    pub delete_files: bool,

    /// Gives each writer its own randomly named subdirectory of `path`.
    ///
    /// # Default
    ///
    /// `false`
    ///
    /// # Environment Variable
    ///
    /// `FSLOAD__CREATE_DIRS`
    pub create_dirs: bool,

    /// Configuration of the internal task runtime.
    pub runtime: Runtime,

    /// Logging configuration.
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            num_writers: 0,
            num_readers: 0,
            file_size: ByteSize::b(DEFAULT_FILE_SIZE),
            files_per_thread: 1,
            reads_per_thread: 1,
            delete_files: false,
            create_dirs: false,
            runtime: Runtime::default(),
            logging: Logging::default(),
        }
    }
}

/// Values set explicitly on the command line.
///
/// Fields left as `None` do not override any other configuration source.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    /// See [`Config::path`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// See [`Config::num_writers`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_writers: Option<usize>,
    /// See [`Config::num_readers`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_readers: Option<usize>,
    /// See [`Config::file_size`], in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// See [`Config::files_per_thread`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_per_thread: Option<usize>,
    /// See [`Config::reads_per_thread`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reads_per_thread: Option<usize>,
    /// See [`Config::delete_files`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_files: Option<bool>,
    /// See [`Config::create_dirs`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_dirs: Option<bool>,
}

impl Config {
    /// Loads configuration from the provided sources.
    ///
    /// Configuration is merged in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. YAML configuration file (if provided)
    /// 3. Environment variables (prefixed with `FSLOAD__`)
    /// 4. Command-line `overrides`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The YAML configuration file cannot be read or parsed
    /// - Environment variables contain invalid values
    /// - No work target `path` was given, or the runtime has no worker threads
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            bail!("no work target configured, pass `--path <dir>` or set `{ENV_PREFIX}PATH`");
        }
        if self.runtime.worker_threads == 0 {
            bail!("runtime.worker_threads must be at least 1");
        }
        Ok(())
    }

    /// Builds the immutable [`Workload`] described by this configuration.
    pub fn workload(&self) -> Workload {
        Workload::builder(&self.path)
            .writers(self.num_writers)
            .readers(self.num_readers)
            .file_size(self.file_size.as_u64())
            .files_per_writer(self.files_per_thread)
            .reads_per_reader(self.reads_per_thread)
            .create_dirs(self.create_dirs)
            .delete_files(self.delete_files)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_require_path() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();

            let error = Config::load(None, &Overrides::default()).unwrap_err();
            assert!(error.to_string().contains("--path"), "{error}");
            Ok(())
        });
    }

    #[test]
    fn defaults_match_flags() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("FSLOAD__PATH", "/tmp/fsload");

            let config = Config::load(None, &Overrides::default()).unwrap();
            assert_eq!(config.path, Path::new("/tmp/fsload"));
            assert_eq!(config.num_writers, 0);
            assert_eq!(config.num_readers, 0);
            assert_eq!(config.file_size, ByteSize::b(1_048_576));
            assert_eq!(config.files_per_thread, 1);
            assert_eq!(config.reads_per_thread, 1);
            assert!(!config.delete_files);
            assert!(!config.create_dirs);
            assert_eq!(config.logging.level, LevelFilter::INFO);
            assert_eq!(config.logging.format, LogFormat::Auto);
            assert!(config.runtime.worker_threads >= 1);

            Ok(())
        });
    }

    #[test]
    fn configurable_via_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FSLOAD__PATH", "/mnt/load");
            jail.set_env("FSLOAD__NUM_WRITERS", "4");
            jail.set_env("FSLOAD__NUM_READERS", "2");
            jail.set_env("FSLOAD__FILE_SIZE", "4KiB");
            jail.set_env("FSLOAD__CREATE_DIRS", "true");
            jail.set_env("FSLOAD__RUNTIME__WORKER_THREADS", "3");
            jail.set_env("FSLOAD__LOGGING__LEVEL", "debug");
            jail.set_env("FSLOAD__LOGGING__FORMAT", "json");

            let config = Config::load(None, &Overrides::default()).unwrap();
            assert_eq!(config.path, Path::new("/mnt/load"));
            assert_eq!(config.num_writers, 4);
            assert_eq!(config.num_readers, 2);
            assert_eq!(config.file_size, ByteSize::kib(4));
            assert!(config.create_dirs);
            assert_eq!(config.runtime.worker_threads, 3);
            assert_eq!(config.logging.level, LevelFilter::DEBUG);
            assert_eq!(config.logging.format, LogFormat::Json);

            Ok(())
        });
    }

    #[test]
    fn configurable_via_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            path: /mnt/load
            num_writers: 8
            file_size: 100
            files_per_thread: 2
            reads_per_thread: 5
            delete_files: true
            logging:
                format: simplified
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|_jail| {
            let config = Config::load(Some(tempfile.path()), &Overrides::default()).unwrap();

            assert_eq!(config.path, Path::new("/mnt/load"));
            assert_eq!(config.num_writers, 8);
            assert_eq!(config.file_size, ByteSize::b(100));
            assert_eq!(config.files_per_thread, 2);
            assert_eq!(config.reads_per_thread, 5);
            assert!(config.delete_files);
            assert_eq!(config.logging.format, LogFormat::Simplified);
            assert_eq!(config.logging.level, LevelFilter::INFO);

            Ok(())
        });
    }

    #[test]
    fn flags_override_env_and_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            path: /from/yaml
            num_writers: 8
            num_readers: 8
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|jail| {
            jail.set_env("FSLOAD__NUM_WRITERS", "4");
            jail.set_env("FSLOAD__NUM_READERS", "4");

            let overrides = Overrides {
                num_readers: Some(1),
                file_size: Some(100_000),
                create_dirs: Some(true),
                ..Default::default()
            };
            let config = Config::load(Some(tempfile.path()), &overrides).unwrap();

            assert_eq!(config.path, Path::new("/from/yaml"));
            // Env should overwrite the yaml config
            assert_eq!(config.num_writers, 4);
            // Flags should overwrite both
            assert_eq!(config.num_readers, 1);
            assert_eq!(config.file_size, ByteSize::b(100_000));
            assert!(config.create_dirs);

            Ok(())
        });
    }

    #[test]
    fn rejects_zero_worker_threads() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FSLOAD__PATH", "/tmp/fsload");
            jail.set_env("FSLOAD__RUNTIME__WORKER_THREADS", "0");

            assert!(Config::load(None, &Overrides::default()).is_err());
            Ok(())
        });
    }

    #[test]
    fn builds_workload() {
        let config = Config {
            path: "/tmp/fsload".into(),
            num_writers: 3,
            file_size: ByteSize::b(100),
            files_per_thread: 2,
            create_dirs: true,
            ..Default::default()
        };

        let expected = Workload::builder("/tmp/fsload")
            .writers(3)
            .file_size(100)
            .files_per_writer(2)
            .create_dirs(true)
            .build();
        assert_eq!(config.workload(), expected);
    }

    #[test]
    fn parses_log_formats() {
        assert_eq!("auto".parse::<LogFormat>().unwrap(), LogFormat::Auto);
        assert!("".parse::<LogFormat>().is_err());
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
