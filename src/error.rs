use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("a task titled '{title}' is already registered")]
    DuplicateTitle { title: String },
}
