use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Entity '{0}' appears more than once in the series")]
    DuplicateEntity(String),
}
