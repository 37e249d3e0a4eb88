//! Solver configuration loading for the CLI.
//!
//! Resolution order (highest to lowest priority):
//! 1. Explicit `--config` file
//! 2. `--preset`
//! 3. `LPBVI_CONFIG`, `LPBVI_CONFIG_DIR`, XDG and system config files
//! 4. Built-in defaults
//!
//! Individual CLI flags (`--tolerance`, `--slack`, ...) are applied on top of
//! whichever base was selected, and the result is validated once.

pub use lp_config::preset::{get_preset, PresetError, PresetName};
pub use lp_config::validate::ValidationError;
pub use lp_config::{ConfigSnapshot, ConfigSource, ExpansionRule, SolverConfig};

use lp_config::resolve::resolve_config;
use lp_config::validate::validate_solver_config;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("config {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// Stable code from the validation layer, or 20 for lookup failures.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::Load { source, .. } | ConfigError::Validation(source) => source.code(),
            ConfigError::NotFound { .. } => 60,
            ConfigError::Preset(_) => 20,
        }
    }
}

impl From<ConfigError> for lp_common::Error {
    fn from(err: ConfigError) -> Self {
        match &err {
            ConfigError::NotFound { path } => lp_common::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )),
            ConfigError::Load {
                source: ValidationError::IoError(msg),
                ..
            } => lp_common::Error::Io(std::io::Error::other(msg.clone())),
            _ => lp_common::Error::Config(err.to_string()),
        }
    }
}

/// CLI-level configuration inputs.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub config_path: Option<PathBuf>,
    pub preset: Option<String>,
    pub tolerance: Option<f64>,
    pub slack: Option<Vec<f64>>,
    pub max_expansions: Option<u32>,
    pub expansion_rule: Option<String>,
    pub seed: Option<u64>,
    pub max_belief_points: Option<usize>,
}

impl ConfigOptions {
    fn apply_overrides(&self, mut config: SolverConfig) -> SolverConfig {
        if let Some(t) = self.tolerance {
            config = config.with_tolerance(t);
        }
        if let Some(slack) = &self.slack {
            config = config.with_slack(slack.clone());
        }
        if let Some(n) = self.max_expansions {
            config = config.with_max_expansions(n);
        }
        if let Some(rule) = &self.expansion_rule {
            config = config.with_expansion_rule(rule.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(cap) = self.max_belief_points {
            config = config.with_max_belief_points(cap);
        }
        config
    }
}

/// Effective solver configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: SolverConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

impl ResolvedConfig {
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::with_source(
            &self.config,
            self.path.as_ref().map(|p| p.display().to_string()),
            &self.source,
        )
    }
}

/// Load, override and validate the solver configuration.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let (base, path, source) = resolve_base(options)?;
    let config = options.apply_overrides(base);
    validate_solver_config(&config)?;
    Ok(ResolvedConfig {
        config,
        path,
        source,
    })
}

fn resolve_base(
    options: &ConfigOptions,
) -> Result<(SolverConfig, Option<PathBuf>, ConfigSource), ConfigError> {
    if let Some(path) = &options.config_path {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
        let config = load_file(path)?;
        return Ok((config, Some(path.clone()), ConfigSource::CliArgument));
    }

    if let Some(name) = &options.preset {
        let preset = PresetName::parse(name).ok_or_else(|| PresetError::UnknownPreset(name.clone()))?;
        return Ok((get_preset(preset), None, ConfigSource::Preset));
    }

    let paths = resolve_config(None);
    match paths.solver {
        Some(path) => {
            let config = load_file(&path)?;
            Ok((config, Some(path), paths.solver_source))
        }
        None => Ok((SolverConfig::default(), None, ConfigSource::BuiltinDefault)),
    }
}

fn load_file(path: &std::path::Path) -> Result<SolverConfig, ConfigError> {
    SolverConfig::from_file(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_file_wins_over_preset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tolerance": 0.2, "max_expansions": 2}}"#).unwrap();
        let options = ConfigOptions {
            config_path: Some(file.path().to_path_buf()),
            preset: Some("thorough".into()),
            ..Default::default()
        };
        let resolved = load_config(&options).unwrap();
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.config.tolerance, 0.2);
        assert_eq!(resolved.config.max_expansions, 2);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let options = ConfigOptions {
            preset: Some("quick".into()),
            tolerance: Some(0.05),
            slack: Some(vec![0.0, 1.0]),
            seed: Some(9),
            ..Default::default()
        };
        let resolved = load_config(&options).unwrap();
        assert_eq!(resolved.source, ConfigSource::Preset);
        assert_eq!(resolved.config.tolerance, 0.05);
        assert_eq!(resolved.config.slack, Some(vec![0.0, 1.0]));
        assert_eq!(resolved.config.seed, 9);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let options = ConfigOptions {
            preset: Some("quick".into()),
            tolerance: Some(-1.0),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert_eq!(err.code(), 65);
        let converted: lp_common::Error = err.into();
        assert_eq!(converted.code(), 20);
    }

    #[test]
    fn unknown_preset_and_missing_file() {
        let err = load_config(&ConfigOptions {
            preset: Some("ludicrous".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Preset(_)));

        let err = load_config(&ConfigOptions {
            config_path: Some(PathBuf::from("/nonexistent/solver.json")),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        let converted: lp_common::Error = err.into();
        assert_eq!(converted.code(), 60);
    }
}
