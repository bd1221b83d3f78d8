use thiserror::Error;

pub type Result<T> = std::result::Result<T, StormfeedError>;

#[derive(Error, Debug)]
pub enum StormfeedError {
    #[error("Configuration error: {0}")]
    Config(String),
}
