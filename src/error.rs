//! Status vocabulary shared by every container in the crate.

use thiserror::Error;

/// Failure statuses returned by container operations.
///
/// Every operation that can fail reports one of these instead of panicking;
/// a failed operation never leaves a partially applied mutation behind.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Storage for a new node or entry could not be obtained. The container
    /// is left exactly as it was before the call.
    #[error("allocation failed: container storage exhausted")]
    AllocationFailure,

    /// Query or removal on an empty container.
    #[error("container is empty")]
    Empty,

    /// The key or element is absent (the container itself is non-empty).
    #[error("key not found")]
    NotFound,

    /// Set-style add of an element that is already present.
    #[error("element already exists")]
    AlreadyExists,

    /// Out-of-range positional access.
    #[error("invalid index {index} for length {len}")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Length of the container at the time of the call.
        len: usize,
    },

    /// A snapshot cursor has no further elements.
    #[error("iteration finished")]
    IterationEnd,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Successful outcome of a map `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Put<V> {
    /// The key was absent; a new entry was linked in.
    Inserted,
    /// The key was present; its value was swapped in place and the prior
    /// value is handed back.
    Replaced(V),
}

impl<V> Put<V> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Put::Inserted)
    }

    /// The replaced value, if any.
    pub fn replaced(self) -> Option<V> {
        match self {
            Put::Inserted => None,
            Put::Replaced(v) => Some(v),
        }
    }
}

/// Red-black invariant failures reported by `validate()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("root node is red")]
    RedRoot,

    #[error("red node has a red child")]
    ConsecutiveReds,

    /// Black heights of the left and right subtrees differ.
    #[error("unbalanced black height: left {left}, right {right}")]
    UnbalancedBlacks { left: usize, right: usize },

    #[error("keys are not in strictly ascending order")]
    OutOfOrder,

    #[error("child does not point back to its parent")]
    BrokenParentLink,

    #[error("reachable node count {reachable} differs from arena size {stored}")]
    SizeMismatch { reachable: usize, stored: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_accessors() {
        let p: Put<i32> = Put::Inserted;
        assert!(p.is_inserted());
        assert_eq!(p.replaced(), None);

        let p = Put::Replaced(7);
        assert!(!p.is_inserted());
        assert_eq!(p.replaced(), Some(7));
    }

    #[test]
    fn messages_name_the_status() {
        assert_eq!(Error::Empty.to_string(), "container is empty");
        assert_eq!(
            Error::InvalidIndex { index: 4, len: 2 }.to_string(),
            "invalid index 4 for length 2"
        );
        assert_eq!(
            Violation::UnbalancedBlacks { left: 2, right: 3 }.to_string(),
            "unbalanced black height: left 2, right 3"
        );
    }
}
