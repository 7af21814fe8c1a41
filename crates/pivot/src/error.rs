//! Error types for pivot.

use crate::scene::NodeId;
use thiserror::Error;

/// Errors returned by fallible math and scene-graph operations.
///
/// Every variant is local and recoverable: it is reported to the immediate
/// caller and never replaced by a silent default.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A direction was required but the vector has zero or non-finite length.
    #[error("degenerate vector: zero or non-finite length")]
    DegenerateVector,

    /// A rotation was required but the quaternion has zero or non-finite norm.
    #[error("degenerate rotation: zero or non-finite quaternion norm")]
    DegenerateRotation,

    /// The transform cannot be inverted (zero scale axis or zero determinant).
    #[error("singular matrix: transform is not invertible")]
    SingularMatrix,

    /// Attaching `child` under `parent` would make `child` its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },

    /// The handle does not refer to a live node.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

pub type Result<T> = core::result::Result<T, Error>;
