use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobsimError {
    #[error("mobsim configuration error: {0}")]
    Config(String),

    #[error("listeners must be attached before the mobsim starts")]
    AlreadyStarted,

    /// Failure raised by a custom engine.
    #[error("mobsim engine failed: {0}")]
    Engine(String),
}

pub type MobsimResult<T> = Result<T, MobsimError>;
