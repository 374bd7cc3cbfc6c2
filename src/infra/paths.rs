// src/infra/paths.rs — Path management
//
// All paths respect the STRATEGOS_HOME environment variable for isolation.
// When STRATEGOS_HOME is set, config and run artifacts live under that
// directory. When unset, config uses ~/.strategos/.

use directories::BaseDirs;
use std::path::PathBuf;

fn strategos_home() -> Option<PathBuf> {
    std::env::var_os("STRATEGOS_HOME").map(PathBuf::from)
}

fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $STRATEGOS_HOME/ or ~/.strategos/
pub fn config_dir() -> PathBuf {
    if let Some(home) = strategos_home() {
        return home;
    }
    dirs_home().join(".strategos")
}

/// Default config file location.
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Directory for run history files (cycle reports, saved populations).
pub fn runs_dir() -> PathBuf {
    config_dir().join("runs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        assert!(config_file().starts_with(config_dir()));
    }

    #[test]
    fn test_runs_dir_under_config_dir() {
        assert!(runs_dir().starts_with(config_dir()));
    }
}
