use std::path::PathBuf;

/// Environment variable naming the directory with the city trip logs.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// Trips shown per raw-data page.
pub const PAGE_SIZE: usize = 5;

/// Runtime settings. The tool takes no flags; everything comes from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        config
    }
}
