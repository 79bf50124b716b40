use crate::submission::ReviewStatus;

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("assessment not found: {0}")]
    NotFound(String),
    #[error(
        "invalid review status: '{input}' (expected one of: {})",
        ReviewStatus::ALLOWED.join(", ")
    )]
    InvalidStatus { input: String },
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create assessment directory: {0}")]
    RecordDirCreation(std::io::Error),
    #[error("failed to write assessment file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read assessment file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize assessment: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize assessment: {0}")]
    YamlDeserialization(serde_yaml::Error),
}

pub type AssessmentResult<T> = std::result::Result<T, AssessmentError>;
