//! Error types
//!
//! Only level construction and progress persistence can fail. Everything that
//! happens during a tick is handled by idempotent guards instead.

use thiserror::Error;

/// A level layout that cannot be turned into a simulation
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout has no pigs")]
    NoPigs,
    #[error("entity {index} has non-positive or non-finite size {width}x{height}")]
    BadDimensions { index: usize, width: f32, height: f32 },
    #[error("entity {index} has a non-finite position")]
    NonFinitePosition { index: usize },
    #[error("entity {index} bottom edge {bottom} is below ground {ground_y}")]
    BelowGround {
        index: usize,
        bottom: f32,
        ground_y: f32,
    },
    #[error("entity {index} stacks on {parent}, which is not an earlier entity")]
    BadStackParent { index: usize, parent: usize },
    #[error("projectile queue is empty")]
    EmptyProjectileQueue,
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("slingshot drag radius must be positive, got {0}")]
    BadDragRadius(f32),
    #[error("gravity scale must be finite and non-negative, got {0}")]
    BadGravityScale(f32),
    #[error("malformed level json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while loading or saving level progress
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed progress json: {0}")]
    Json(#[from] serde_json::Error),
}
