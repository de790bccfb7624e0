// THEORY:
// Failures in this crate only ever come from the edges: a capture collaborator handing
// over a buffer that does not match its declared dimensions, a configuration that cannot
// describe a working pipeline, or the I/O around loading frames and config files.
// Everything that happens inside a cycle ("no hand", "no motion", "too soon") is data,
// not an error, so the core stages stay total and never return `Result`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height} with {channels} channels")]
    InvalidFrame {
        width: u32,
        height: u32,
        channels: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("camera {0} is not registered with the pool")]
    UnknownCamera(u32),

    #[error("camera {0} is already registered with the pool")]
    DuplicateCamera(u32),

    #[error("camera pool is shut down")]
    PoolClosed,

    #[error("gesture sink has no receiver")]
    SinkClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;
