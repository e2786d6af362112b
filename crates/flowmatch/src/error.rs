//! Error types for flowmatch

use thiserror::Error;

use crate::graph::VertexId;

/// Result type alias using flowmatch's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`] variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    BadParameter,
    NotFound,
    AlreadyExists,
    OutOfMemory,
    Unsupported,
    /// The input or an intermediate state broke an algorithmic invariant.
    /// The matching attempt must be abandoned.
    InvariantViolation,
}

/// Errors that can occur while building graphs or solving assignments.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Vertex index outside `0..order`
    #[error("vertex {vertex} out of range for graph of order {order}")]
    VertexOutOfRange { vertex: VertexId, order: usize },

    /// Edge cost whose residual (negated) cost is not representable
    #[error("edge cost {0} cannot be negated for a residual edge")]
    InvalidCost(i64),

    /// One side of the bipartition is empty
    #[error("degenerate bipartition: {left} left and {right} right vertices")]
    DegeneratePartition { left: usize, right: usize },

    /// Predecessor buffer does not match the graph order
    #[error("predecessor buffer has length {len}, graph has order {order}")]
    PredecessorLength { len: usize, order: usize },

    #[error("graph already carries a flow source and sink")]
    AlreadyTransformed,

    #[error("graph has no flow source and sink")]
    NotTransformed,

    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("edge ({from}, {to}) not found")]
    EdgeNotFound { from: VertexId, to: VertexId },

    #[error("edge ({from}, {to}) already exists")]
    EdgeExists { from: VertexId, to: VertexId },

    /// Allocation failure; the graph is left as it was before the call
    #[error("out of memory")]
    OutOfMemory,

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Vertex with both inbound and outbound edges
    #[error("graph is not unidirectionally bipartite: vertex {vertex} has in- and out-edges")]
    NotBipartite { vertex: VertexId },

    #[error("negative-cost cycle reachable from vertex {origin}")]
    NegativeCycle { origin: VertexId },

    #[error("cost overflow while relaxing edge ({from}, {to})")]
    CostOverflow { from: VertexId, to: VertexId },

    #[error("capacity overflow on residual edge ({from}, {to})")]
    CapacityOverflow { from: VertexId, to: VertexId },

    #[error("negative reduced cost on edge ({from}, {to})")]
    NegativeReducedCost { from: VertexId, to: VertexId },

    #[error("residual edge ({from}, {to}) missing during augmentation")]
    MissingResidualEdge { from: VertexId, to: VertexId },

    /// Predecessor chain does not lead back to the flow source
    #[error("augmenting path broken at vertex {vertex}")]
    BrokenPath { vertex: VertexId },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VertexOutOfRange { .. }
            | Self::InvalidCost(_)
            | Self::DegeneratePartition { .. }
            | Self::PredecessorLength { .. }
            | Self::AlreadyTransformed
            | Self::NotTransformed => ErrorKind::BadParameter,
            Self::VertexNotFound(_) | Self::EdgeNotFound { .. } => ErrorKind::NotFound,
            Self::EdgeExists { .. } => ErrorKind::AlreadyExists,
            Self::OutOfMemory => ErrorKind::OutOfMemory,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::NotBipartite { .. }
            | Self::NegativeCycle { .. }
            | Self::CostOverflow { .. }
            | Self::CapacityOverflow { .. }
            | Self::NegativeReducedCost { .. }
            | Self::MissingResidualEdge { .. }
            | Self::BrokenPath { .. } => ErrorKind::InvariantViolation,
        }
    }

    #[inline]
    pub fn is_invariant_violation(&self) -> bool {
        self.kind() == ErrorKind::InvariantViolation
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
