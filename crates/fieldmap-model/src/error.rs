use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("target schema '{0}' has no fields")]
    EmptySchema(String),
    #[error("blank target field name at position {0}")]
    BlankTargetField(usize),
    #[error("duplicate target field '{0}'")]
    DuplicateTargetField(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
