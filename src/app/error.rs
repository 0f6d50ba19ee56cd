use thiserror::Error;

/// The application could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no router mounted")]
    MissingRouter,

    #[error("an application instance already exists in this process")]
    AlreadyCreated,

    #[error("invalid mount prefix '{0}': must start with '/', must not end with '/', and must not be the root")]
    InvalidPrefix(String),
}
