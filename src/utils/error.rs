use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML export error: {message}")]
    XmlError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No {collection} at position {position} (have {len})")]
    PositionOutOfRange {
        collection: &'static str,
        position: usize,
        len: usize,
    },

    #[error("Corrupt data document: {message}")]
    CorruptDocument { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl RegistryError {
    pub(crate) fn out_of_range(collection: &'static str, position: usize, len: usize) -> Self {
        RegistryError::PositionOutOfRange {
            collection,
            position,
            len,
        }
    }

    /// Lookup failures are retryable by the caller with another position.
    pub fn is_lookup(&self) -> bool {
        matches!(self, RegistryError::PositionOutOfRange { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RegistryError::IoError(e) => format!("Could not access the data files: {}", e),
            RegistryError::PositionOutOfRange {
                collection, len, ..
            } if *len == 0 => format!("There is no {} to choose from", collection),
            RegistryError::PositionOutOfRange {
                collection, len, ..
            } => format!("Choose a {} between 1 and {}", collection, len),
            RegistryError::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RegistryError::IoError(_) => "Check that the data directory exists and is writable",
            RegistryError::SerializationError(_) | RegistryError::CorruptDocument { .. } => {
                "Remove or repair the data document; a fresh one is written on the next save"
            }
            RegistryError::XmlError { .. } => "Check free disk space and retry the save",
            RegistryError::ConfigError { .. }
            | RegistryError::ConfigValidationError { .. }
            | RegistryError::InvalidConfigValueError { .. } => "Fix the configuration file or flags",
            RegistryError::PositionOutOfRange { .. } => "Run `show` to list valid positions",
            RegistryError::ValidationError { .. } => "Correct the input and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
