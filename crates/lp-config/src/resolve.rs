//! Where `solver.json` comes from.
//!
//! Candidates are tried in order and the first existing file wins:
//! explicit path, `LPBVI_CONFIG`, `$LPBVI_CONFIG_DIR/solver.json`,
//! `~/.config/lpbvi/solver.json`, `/etc/lpbvi/solver.json`. With none
//! present the caller falls back to [`SolverConfig::default`](crate::SolverConfig).

use std::path::{Path, PathBuf};

/// Result of a config search.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// The chosen `solver.json`, if any candidate exists.
    pub solver: Option<PathBuf>,

    /// Which candidate produced `solver`.
    pub solver_source: ConfigSource,
}

/// Origin of the effective solver configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line.
    CliArgument,

    /// `LPBVI_CONFIG` or `LPBVI_CONFIG_DIR`.
    Environment,

    /// Per-user config directory.
    XdgConfig,

    /// `/etc/lpbvi`.
    SystemConfig,

    /// `--preset`; no file involved.
    Preset,

    /// Nothing found; compiled-in defaults.
    #[default]
    BuiltinDefault,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::CliArgument => "CLI argument",
            ConfigSource::Environment => "environment variable",
            ConfigSource::XdgConfig => "XDG config",
            ConfigSource::SystemConfig => "system config",
            ConfigSource::Preset => "preset",
            ConfigSource::BuiltinDefault => "builtin default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ENV_CONFIG_PATH: &str = "LPBVI_CONFIG";
pub const ENV_CONFIG_DIR: &str = "LPBVI_CONFIG_DIR";

pub const SOLVER_FILENAME: &str = "solver.json";

const APP_NAME: &str = "lpbvi";

/// Search for `solver.json` using the process environment.
pub fn resolve_config(cli_solver: Option<&Path>) -> ConfigPaths {
    resolve_with(cli_solver, |key| std::env::var(key).ok())
}

/// Search for `solver.json` with an explicit environment lookup.
pub fn resolve_with<F>(cli_solver: Option<&Path>, env: F) -> ConfigPaths
where
    F: Fn(&str) -> Option<String>,
{
    candidates(cli_solver, env)
        .into_iter()
        .find(|(path, _)| path.is_file())
        .map(|(path, source)| ConfigPaths {
            solver: Some(path),
            solver_source: source,
        })
        .unwrap_or_default()
}

/// Every location that could hold the solver config, highest precedence
/// first. Paths are not checked for existence.
pub fn candidates<F>(cli_solver: Option<&Path>, env: F) -> Vec<(PathBuf, ConfigSource)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = Vec::with_capacity(5);
    if let Some(path) = cli_solver {
        out.push((path.to_path_buf(), ConfigSource::CliArgument));
    }
    if let Some(path) = env(ENV_CONFIG_PATH).filter(|p| !p.is_empty()) {
        out.push((PathBuf::from(path), ConfigSource::Environment));
    }
    if let Some(dir) = env(ENV_CONFIG_DIR).filter(|d| !d.is_empty()) {
        out.push((PathBuf::from(dir).join(SOLVER_FILENAME), ConfigSource::Environment));
    }
    if let Some(dir) = xdg_config_dir() {
        out.push((dir.join(SOLVER_FILENAME), ConfigSource::XdgConfig));
    }
    out.push((
        system_config_dir().join(SOLVER_FILENAME),
        ConfigSource::SystemConfig,
    ));
    out
}

/// Per-user config directory for lpbvi.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn candidate_order() {
        let env = |key: &str| match key {
            ENV_CONFIG_PATH => Some("/tmp/a.json".to_string()),
            ENV_CONFIG_DIR => Some("/tmp/conf".to_string()),
            _ => None,
        };
        let list = candidates(Some(Path::new("/cli/solver.json")), env);
        let sources: Vec<ConfigSource> = list.iter().map(|(_, s)| *s).collect();
        assert_eq!(sources[0], ConfigSource::CliArgument);
        assert_eq!(list[1].0, PathBuf::from("/tmp/a.json"));
        assert_eq!(list[2].0, PathBuf::from("/tmp/conf/solver.json"));
        assert_eq!(*sources.last().unwrap(), ConfigSource::SystemConfig);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let env = |_: &str| Some(String::new());
        let list = candidates(None, env);
        assert!(list.iter().all(|(_, s)| *s != ConfigSource::Environment));
    }

    #[test]
    fn config_dir_file_is_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SOLVER_FILENAME), "{}").unwrap();
        let dir_str = dir.path().display().to_string();
        let paths = resolve_with(None, |key| (key == ENV_CONFIG_DIR).then(|| dir_str.clone()));
        assert_eq!(paths.solver_source, ConfigSource::Environment);
        assert_eq!(paths.solver, Some(dir.path().join(SOLVER_FILENAME)));
    }

    #[test]
    fn explicit_path_beats_environment() {
        let dir = tempfile::tempdir().unwrap();
        let cli = dir.path().join("mine.json");
        std::fs::write(&cli, "{}").unwrap();
        std::fs::write(dir.path().join(SOLVER_FILENAME), "{}").unwrap();
        let dir_str = dir.path().display().to_string();
        let paths = resolve_with(Some(&cli), |key| {
            (key == ENV_CONFIG_DIR).then(|| dir_str.clone())
        });
        assert_eq!(paths.solver_source, ConfigSource::CliArgument);
        assert_eq!(paths.solver, Some(cli));
    }

    #[test]
    fn missing_cli_path_falls_through() {
        let paths = resolve_with(Some(Path::new("/nonexistent/lpbvi/solver.json")), no_env);
        assert_ne!(paths.solver_source, ConfigSource::CliArgument);
    }

    #[test]
    fn source_display() {
        assert_eq!(ConfigSource::CliArgument.to_string(), "CLI argument");
        assert_eq!(ConfigSource::BuiltinDefault.to_string(), "builtin default");
    }

    #[test]
    fn system_dir_is_etc() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/lpbvi"));
    }
}
