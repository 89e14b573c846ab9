//! Error types for scene setup and rendering.

use thiserror::Error;

/// Errors that reject invalid triangle soup before it reaches the BVH.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Mesh has no faces")]
    Empty,

    #[error("Face {face} references vertex {index}, but the mesh has {len} vertices")]
    IndexOutOfRange { face: usize, index: u32, len: usize },

    #[error("Expected {expected} {attribute} entries (one per vertex), found {found}")]
    AttributeCountMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Expected {expected} material ids (one per face), found {found}")]
    MaterialCountMismatch { expected: usize, found: usize },
}

/// Errors that can occur while loading textures.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture has zero size: {0}")]
    EmptyImage(String),
}

/// Errors surfaced by the renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("Render cancelled")]
    Cancelled,
}

pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_error_display() {
        let err = MeshError::IndexOutOfRange {
            face: 2,
            index: 9,
            len: 4,
        };
        assert_eq!(
            err.to_string(),
            "Face 2 references vertex 9, but the mesh has 4 vertices"
        );
    }

    #[test]
    fn test_render_error_from_mesh() {
        let err: RenderError = MeshError::Empty.into();
        assert!(matches!(err, RenderError::Mesh(MeshError::Empty)));
        assert_eq!(err.to_string(), "Invalid mesh: Mesh has no faces");
    }
}
