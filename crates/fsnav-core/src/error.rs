//! Error types for `fsnav-core`.
//!
//! Fallible backend and configuration operations return [`CoreResult<T>`],
//! an alias for `Result<T, CoreError>`. Tree-cache lookups do not surface
//! these errors: a location that cannot be resolved is reported as absent.

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The location does not exist (or vanished while being resolved).
    #[error("location not found: {0}")]
    NotFound(String),

    /// The process lacks permission to access the location.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A container was expected but the location is a leaf entry.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The input could not be turned into a backend location.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An image could not be decoded into a thumbnail.
    #[error("image error: {0}")]
    Image(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Maps an I/O error raised while touching `path` onto the matching variant.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                Self::PermissionDenied(path.display().to_string())
            }
            _ => Self::Io(err),
        }
    }

    /// Returns `true` if the error means the location no longer exists.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<image::ImageError> for CoreError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err.to_string())
    }
}

/// Convenience alias used throughout `fsnav-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn not_found_displays_location() {
        let err = CoreError::NotFound("/missing/file".to_string());
        assert_eq!(err.to_string(), "location not found: /missing/file");
    }

    #[test]
    fn permission_denied_displays_location() {
        let err = CoreError::PermissionDenied("/secret".to_string());
        assert_eq!(err.to_string(), "permission denied: /secret");
    }

    #[test]
    fn invalid_location_displays_message() {
        let err = CoreError::InvalidLocation("::{bogus}".to_string());
        assert_eq!(err.to_string(), "invalid location: ::{bogus}");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = CoreError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn from_io_maps_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CoreError::from_io(Path::new("/a/b"), io_err);
        assert!(matches!(err, CoreError::NotFound(ref p) if p == "/a/b"));
        assert!(err.is_not_found());
    }

    #[test]
    fn from_io_maps_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = CoreError::from_io(Path::new("/root"), io_err);
        assert!(matches!(err, CoreError::PermissionDenied(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("boom"));
    }

    #[test]
    fn raw_io_not_found_counts_as_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(CoreError::Io(io_err).is_not_found());
    }
}
