//! Error types for the planner core.

use crate::models::Point3;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// Rejected at ingestion: min > max on some axis or a non-finite bound.
    #[error("invalid obstacle {bounds:?}: {reason}")]
    InvalidObstacle {
        bounds: [f64; 6],
        reason: &'static str,
    },

    /// A generated corner vertex does not sit on a footprint corner of its obstacle.
    #[error("no owning obstacle for corner vertex ({}, {}, {})", vertex.x, vertex.y, vertex.z)]
    OwningObstacleNotFound { vertex: Point3 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("placed {placed} of {requested} obstacles before running out of attempts")]
    FieldExhausted { placed: usize, requested: usize },
}

pub type Result<T> = std::result::Result<T, PlannerError>;
