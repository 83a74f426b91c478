use thiserror::Error;

/// Errors produced while building scenes or rendering them
#[derive(Error, Debug)]
pub enum TracerError {
    #[error("mesh has degenerate geometry: {0}")]
    DegenerateMesh(String),

    #[error("edge ({0}, {1}) has no faces")]
    EdgeWithoutFaces(usize, usize),

    #[error("singular transform: {0}")]
    SingularTransform(String),

    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("degenerate camera: {0}")]
    DegenerateCamera(String),

    #[error("render was cancelled")]
    Cancelled,

    #[error("render worker failed: {0}")]
    Worker(String),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TracerError>;
