use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingCredential(String),

    #[error("{0} still holds the placeholder value from the .env template")]
    PlaceholderCredential(String),

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
}
