use std::path::Path;

use minelab_core::{EvalConfig, Fallback, GameConfig, RewardScheme};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Random,
    Heuristic,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub kind: AgentKind,
    /// Only used by the random agent.
    pub flag_probability: f64,
}

impl Default for AgentSection {
    fn default() -> Self {
        AgentSection {
            kind: AgentKind::Heuristic,
            flag_probability: 0.0,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvaluationSection {
    pub games: usize,
    pub max_turns: usize,
    pub seed: u64,
    pub fallback: Fallback,
}

impl Default for EvaluationSection {
    fn default() -> Self {
        let defaults = EvalConfig::default();
        EvaluationSection {
            games: 1_000,
            max_turns: defaults.max_turns,
            seed: defaults.seed,
            fallback: defaults.fallback,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: GameConfig,
    pub agent: AgentSection,
    pub evaluation: EvaluationSection,
    pub rewards: RewardScheme,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;

        if self.evaluation.games == 0 {
            return Err(ConfigError::Validation(
                "evaluation.games must be > 0".into(),
            ));
        }
        if self.evaluation.max_turns == 0 {
            return Err(ConfigError::Validation(
                "evaluation.max_turns must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.agent.flag_probability) {
            return Err(ConfigError::Validation(
                "agent.flag_probability must be in [0, 1]".into(),
            ));
        }
        if self.rewards.mine > 0.0 {
            return Err(ConfigError::Validation(
                "rewards.mine must be <= 0".into(),
            ));
        }

        Ok(())
    }

    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            board: self.board,
            games: self.evaluation.games,
            max_turns: self.evaluation.max_turns,
            seed: self.evaluation.seed,
            fallback: self.evaluation.fallback,
            rewards: self.rewards,
            // the CLI only reports aggregates
            keep_traces: false,
        }
    }

    /// Generate the default configuration as a TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config should serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.board, GameConfig::default());
        assert_eq!(config.agent.kind, AgentKind::Heuristic);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.evaluation.games, 1_000);
        assert_eq!(config.rewards, RewardScheme::default());
    }

    #[test]
    fn test_partial_board_section() {
        let config: AppConfig = toml::from_str(
            r#"
[board]
rows = 16
cols = 30
mines = 99
"#,
        )
        .unwrap();
        assert_eq!(config.board.size(), (16, 30));
        assert!(!config.board.first_click_safe);
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.evaluation.games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_max_turns() {
        let mut config = AppConfig::default();
        config.evaluation.max_turns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_full_board() {
        let mut config = AppConfig::default();
        config.board.mines = 81;
        assert!(matches!(config.validate(), Err(ConfigError::Board(_))));
    }

    #[test]
    fn test_validation_rejects_flag_probability_out_of_range() {
        let mut config = AppConfig::default();
        config.agent.flag_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_positive_mine_reward() {
        let mut config = AppConfig::default();
        config.rewards.mine = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_minelab.toml")).unwrap();
        assert_eq!(config.evaluation.games, 1_000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minelab.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[agent]
kind = "random"

[evaluation]
games = 50
fallback = "forfeit"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.agent.kind, AgentKind::Random);
        assert_eq!(config.evaluation.games, 50);
        assert_eq!(config.evaluation.fallback, Fallback::Forfeit);
        // Others are defaults
        assert_eq!(config.board, GameConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minelab.toml");
        std::fs::write(&path, "[board]\nrows = 0\n").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Board(_))));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }

    #[test]
    fn test_eval_config_carries_sections() {
        let mut config = AppConfig::default();
        config.evaluation.seed = 42;
        config.rewards.win = 5.0;

        let eval = config.eval_config();

        assert_eq!(eval.seed, 42);
        assert_eq!(eval.rewards.win, 5.0);
        assert_eq!(eval.games, 1_000);
        assert!(!eval.keep_traces);
    }
}
