use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("{component} is not compatible with the current {stage} configuration")]
    Compatibility { component: String, stage: String },

    #[error("{component} can't be placed in the {stage} stage")]
    StageMismatch { component: String, stage: String },

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("{stage} has no component at index {index}")]
    ComponentIndex { stage: String, index: usize },

    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("{component} has no option named {option}")]
    UnknownOption { component: String, option: String },

    #[error("Invalid value for option {option}: {reason}")]
    InvalidOptionValue { option: String, reason: String },

    #[error("Invalid dice expression: {0}")]
    DiceParse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
