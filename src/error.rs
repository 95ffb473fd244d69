use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThumbprintError>;

#[derive(Error, Debug)]
pub enum ThumbprintError {
    #[error("Invalid argument: {field} must not be empty")]
    InvalidArgument { field: &'static str },

    #[error("Duplicate thumbprint: {0}")]
    DuplicateThumbprint(String),

    #[error("Integrity record is sealed; no further thumbprints can be attached")]
    RecordSealed,

    #[error("Compiled item already has an integrity record: {0}")]
    DuplicateItem(String),

    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Manifest error in {file}: {message}")]
    Manifest { file: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ThumbprintError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
