//! Chunked frame-processing pipeline.

/// Slot arena bounding how many frames are resident.
pub mod arena;
/// Chunk arithmetic.
pub mod chunk;
/// The load/transform/store loop.
pub mod driver;
