use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// One or more field rules failed. Messages are kept in rule order.
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

impl Error {
    /// The individual validation messages, empty for non-validation errors.
    pub fn messages(&self) -> &[String] {
        match self {
            Error::Validation(messages) => messages,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
