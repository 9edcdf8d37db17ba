//! Error types for cache operations

use thiserror::Error;

/// Main error type for all cacheme operations
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// A node's `load` was invoked but it has no implementation and no
    /// override/Memoize function was supplied.
    #[error("node has no load implementation: {0}")]
    NotImplemented(String),

    /// The wrapped `load`/`load_all` call raised an error.
    #[error("load failed: {0}")]
    LoadFailure(String),

    /// A type-erased batch contained nodes of more than one class.
    #[error("node class mismatch: expected [{expected}], got [{actual}]")]
    ClassMismatch { expected: String, actual: String },

    /// A storage backend returned an error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// A serializer failed to encode or decode a value.
    #[error("serializer error: {0}")]
    SerializerError(String),
}

/// Result type alias for cacheme operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::LoadFailure("boom".to_string());
        assert_eq!(err.to_string(), "load failed: boom");

        let err = CacheError::ClassMismatch {
            expected: "FooNode".to_string(),
            actual: "BarNode".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "node class mismatch: expected [FooNode], got [BarNode]"
        );
    }

    #[test]
    fn test_error_clone() {
        let err = CacheError::NotImplemented("FooNode".to_string());
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
