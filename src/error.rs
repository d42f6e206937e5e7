//! Error types for graph construction.

use thiserror::Error;

use crate::graph::NodeId;
use crate::validation::ValidationError;

/// Errors raised while mapping coordinates or building a graph.
///
/// Every variant aborts the build; a partially populated graph is never
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node needs more outgoing edges than its storage allows.
    #[error("node {node} needs {degree} outgoing edges but storage holds {limit}")]
    ConfigurationOverflow {
        /// Node whose edge list overflowed.
        node: NodeId,
        /// Edges requested for the node.
        degree: usize,
        /// Edges the node can hold.
        limit: usize,
    },
    /// A hub, time or connection index outside the configured bounds.
    #[error("{coordinate} {value} out of range (must be below {bound})")]
    OutOfRangeCoordinate {
        /// Which coordinate was rejected.
        coordinate: Coordinate,
        /// Rejected value.
        value: usize,
        /// Exclusive upper bound.
        bound: usize,
    },
    /// The configuration failed validation.
    #[error("invalid configuration: {}", join(.0))]
    InvalidConfig(Vec<ValidationError>),
}

/// Coordinate kinds checked by the node index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Hub,
    Time,
    Connection,
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Coordinate::Hub => "hub",
            Coordinate::Time => "time step",
            Coordinate::Connection => "restricted connection",
        };
        f.write_str(name)
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_display_messages() {
        let overflow = GraphError::ConfigurationOverflow {
            node: 7,
            degree: 3,
            limit: 2,
        };
        assert_eq!(
            overflow.to_string(),
            "node 7 needs 3 outgoing edges but storage holds 2"
        );

        let range = GraphError::OutOfRangeCoordinate {
            coordinate: Coordinate::Time,
            value: 9,
            bound: 4,
        };
        assert_eq!(range.to_string(), "time step 9 out of range (must be below 4)");
    }

    #[test]
    fn test_invalid_config_lists_all() {
        let err = GraphError::InvalidConfig(vec![
            ValidationError::new(ValidationErrorKind::EmptyNetwork, "no hubs"),
            ValidationError::new(ValidationErrorKind::InvalidDelay, "zero delay"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("no hubs"));
        assert!(msg.contains("zero delay"));
    }
}
