use std::fs::File;
use std::io::Read;
use std::path::Path;

use failure::ResultExt;
use serde::Deserialize;
use serde::Serialize;

use crate::logging::LogLevel;
use crate::ErrorKind;
use crate::Result;

/// Watcher fixture configuration options.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Zookeeper ensemble connection string.
    #[serde(default = "Config::default_ensemble")]
    pub ensemble: String,

    /// Logging verbosity for fixture and watcher output.
    #[serde(default)]
    pub level: LogLevel,

    /// Zookeeper session timeout (in seconds).
    #[serde(default = "Config::default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            ensemble: Config::default_ensemble(),
            level: LogLevel::default(),
            timeout: Config::default_timeout(),
        }
    }
}

impl Config {
    fn default_ensemble() -> String {
        "localhost:2181".into()
    }

    fn default_timeout() -> u64 {
        10
    }
}

impl Config {
    /// Loads the configuration from the given [`std::fs::File`].
    ///
    /// [`std::fs::File`]: https://doc.rust-lang.org/std/fs/struct.File.html
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let config = File::open(path).with_context(|_| ErrorKind::ConfigLoad)?;
        Config::from_reader(config)
    }

    /// Loads the configuration from the given [`std::io::Read`].
    ///
    /// [`std::io::Read`]: https://doc.rust-lang.org/std/io/trait.Read.html
    pub fn from_reader<R: Read>(reader: R) -> Result<Config> {
        let conf = serde_yaml::from_reader(reader).with_context(|_| ErrorKind::ConfigLoad)?;
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use super::LogLevel;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.ensemble, "localhost:2181");
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn from_reader_empty_uses_defaults() {
        let config = Config::from_reader("{}".as_bytes()).expect("config to load successfully");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn from_reader_overrides() {
        let yaml = "ensemble: 'zoo1:2181,zoo2:2181'\nlevel: Warning\ntimeout: 30\n";
        let config = Config::from_reader(yaml.as_bytes()).expect("config to load successfully");
        assert_eq!(config.ensemble, "zoo1:2181,zoo2:2181");
        assert_eq!(config.level, LogLevel::Warning);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn from_reader_rejects_garbage() {
        let result = Config::from_reader("ensemble: [not, a, string".as_bytes());
        assert!(result.is_err());
    }
}
