//! Authoring errors for track curves.

use thiserror::Error;

/// Ways a curve edit or construction can be rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    /// Too few nodes for the requested construction.
    #[error("insufficient nodes: need at least {required}, got {actual}")]
    InsufficientNodes {
        /// Nodes the construction needs.
        required: usize,
        /// Nodes supplied.
        actual: usize,
    },

    /// An edit addressed a node the curve does not have.
    #[error("node index {index} out of range for curve with {len} nodes")]
    NodeOutOfRange {
        /// Index passed to the edit.
        index: usize,
        /// Current node count.
        len: usize,
    },

    /// A node position or handle holds NaN or infinity.
    #[error("non-finite value in node {index}: {reason}")]
    NonFinite {
        /// Node carrying the bad value.
        index: usize,
        /// Field that was not finite.
        reason: String,
    },
}

impl CurveError {
    /// [`CurveError::InsufficientNodes`].
    #[must_use]
    pub fn insufficient_nodes(required: usize, actual: usize) -> Self {
        Self::InsufficientNodes { required, actual }
    }

    /// [`CurveError::NodeOutOfRange`].
    #[must_use]
    pub fn node_out_of_range(index: usize, len: usize) -> Self {
        Self::NodeOutOfRange { index, len }
    }

    /// [`CurveError::NonFinite`].
    #[must_use]
    pub fn non_finite(index: usize, reason: impl Into<String>) -> Self {
        Self::NonFinite {
            index,
            reason: reason.into(),
        }
    }

    /// Whether this rejects a construction for having too few nodes.
    #[must_use]
    pub fn is_insufficient_nodes(&self) -> bool {
        matches!(self, Self::InsufficientNodes { .. })
    }

    /// Whether an edit addressed a missing node.
    #[must_use]
    pub fn is_node_out_of_range(&self) -> bool {
        matches!(self, Self::NodeOutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_counts() {
        let message = CurveError::insufficient_nodes(2, 1).to_string();
        assert!(message.contains("need at least 2") && message.contains("got 1"));

        let message = CurveError::node_out_of_range(7, 3).to_string();
        assert!(message.contains("index 7") && message.contains("3 nodes"));
    }

    #[test]
    fn test_predicates() {
        assert!(CurveError::insufficient_nodes(2, 0).is_insufficient_nodes());
        assert!(!CurveError::insufficient_nodes(2, 0).is_node_out_of_range());
        assert!(CurveError::node_out_of_range(1, 1).is_node_out_of_range());
        assert!(!CurveError::non_finite(0, "next_handle.y").is_node_out_of_range());
    }

    #[test]
    fn test_non_finite_keeps_field_name() {
        let err = CurveError::non_finite(2, "position.x");
        assert!(
            matches!(err, CurveError::NonFinite { index: 2, ref reason } if reason == "position.x")
        );
    }
}
