use std::path::PathBuf;

use minelab_core::GameError;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid board: {0}")]
    Board(#[from] GameError),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = ConfigError::from(GameError::EmptyBoard { rows: 0, cols: 4 });
        assert_eq!(
            err.to_string(),
            "invalid board: Board dimensions must be positive, got 0x4"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation("evaluation.games must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: evaluation.games must be > 0"
        );
    }
}
