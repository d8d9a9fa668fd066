// ABOUTME: Error types for the imgcat pipeline
// ABOUTME: Distinguishes fatal normalization errors from degradable sniffing errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImgcatError {
    #[error("unsupported input type: {0}")]
    UnsupportedType(&'static str),

    #[error("missing optional dependency: {0}")]
    MissingOptionalDependency(&'static str),

    #[error("expected a 2D (grayscale) or 3D (RGB/RGBA) pixel array, but given shape: {0:?}")]
    InvalidShape(Vec<usize>),

    #[error("empty buffer")]
    EmptyBuffer,

    #[error("invalid {format} file: header truncated")]
    MalformedHeader { format: &'static str },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure inside a caller-supplied converter or decoder.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_actionable() {
        let err = ImgcatError::MissingOptionalDependency("tensor-to-PNG converter");
        assert!(err.to_string().contains("tensor-to-PNG converter"));

        let err = ImgcatError::InvalidShape(vec![2, 2, 5]);
        assert!(err.to_string().contains("[2, 2, 5]"));

        let err = ImgcatError::MalformedHeader { format: "GIF" };
        assert_eq!(err.to_string(), "invalid GIF file: header truncated");
    }
}
