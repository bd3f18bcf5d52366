/// Result type used by the containers.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by container operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An index was not smaller than the container's length.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// An element was requested from an empty container.
    #[error("container is empty")]
    Empty,

    /// A map lookup did not find the requested key.
    #[error("key not found")]
    KeyNotFound,
}
