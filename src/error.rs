use thiserror::Error;

/// Errors raised while building a face or its render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaceError {
    /// A layer needs at least one pixel in each direction.
    #[error("frame {width}x{height} has no drawable area")]
    EmptyFrame { width: u32, height: u32 },
    /// Origin and size must each fit in an `i16`.
    #[error("frame at ({x}, {y}) sized {width}x{height} exceeds the i16 range")]
    FrameTooLarge { x: i32, y: i32, width: u32, height: u32 },
    #[error("framebuffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}
