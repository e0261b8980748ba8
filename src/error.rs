//! Error types for framegate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FramegateError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Stream and source errors
    #[error("Failed to open stream for track {sid}: {message}")]
    StreamOpen { sid: String, message: String },

    #[error("Frame source read failed: {message}")]
    SourceRead { message: String },

    // Transform errors
    #[error("Frame transform failed: {message}")]
    Transform { message: String },

    #[error("Frame buffer mismatch: {width}x{height} {format} needs {expected} bytes, got {actual}")]
    FrameGeometry {
        width: u32,
        height: u32,
        format: &'static str,
        expected: usize,
        actual: usize,
    },

    // Sink errors
    #[error("Frame publish failed: {message}")]
    Publish { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, FramegateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = FramegateError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = FramegateError::ConfigInvalidValue {
            key: "queue_capacity".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for queue_capacity: must be at least 1"
        );
    }

    #[test]
    fn test_stream_open_display() {
        let error = FramegateError::StreamOpen {
            sid: "TR_abc123".to_string(),
            message: "no such track".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to open stream for track TR_abc123: no such track"
        );
    }

    #[test]
    fn test_source_read_display() {
        let error = FramegateError::SourceRead {
            message: "decoder stalled".to_string(),
        };
        assert_eq!(error.to_string(), "Frame source read failed: decoder stalled");
    }

    #[test]
    fn test_transform_display() {
        let error = FramegateError::Transform {
            message: "inference timed out".to_string(),
        };
        assert_eq!(error.to_string(), "Frame transform failed: inference timed out");
    }

    #[test]
    fn test_frame_geometry_display() {
        let error = FramegateError::FrameGeometry {
            width: 4,
            height: 2,
            format: "rgb24",
            expected: 24,
            actual: 12,
        };
        assert_eq!(
            error.to_string(),
            "Frame buffer mismatch: 4x2 rgb24 needs 24 bytes, got 12"
        );
    }

    #[test]
    fn test_publish_display() {
        let error = FramegateError::Publish {
            message: "track closed".to_string(),
        };
        assert_eq!(error.to_string(), "Frame publish failed: track closed");
    }

    #[test]
    fn test_other_display() {
        let error = FramegateError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: FramegateError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: FramegateError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<FramegateError>();
        assert_sync::<FramegateError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
