use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// Raised by consistency checks before the first iteration; always fatal.
    #[error("inconsistent configuration: {}", .0.join("; "))]
    Inconsistent(Vec<String>),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
