//! Error types for dictionary operations.
//!
//! Only two things can go wrong when working with a dictionary:
//!
//! - A caller hands a checked insertion a missing key or value
//!   ([`DictionaryError::InvalidArgument`]).
//! - A structural audit finds a node that breaks one of the tree invariants
//!   ([`InvariantViolation`]). A correctly functioning [`AvlTreeMap`] never
//!   produces one; the type exists so callers and tests can audit a tree.
//!
//! A key that is not present is *not* an error: lookups return `Option`.
//!
//! [`AvlTreeMap`]: super::AvlTreeMap

/// Represents a missing argument passed to a checked dictionary operation.
///
/// # Examples
///
/// ```rust
/// use avlmap::dictionary::InvalidArgumentError;
///
/// let error = InvalidArgumentError {
///     operation: "try_insert",
///     argument: "key",
/// };
/// assert_eq!(
///     format!("{}", error),
///     "try_insert: `key` must be present"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgumentError {
    /// The name of the operation that rejected its input.
    pub operation: &'static str,
    /// The name of the argument that was missing (`"key"` or `"value"`).
    pub argument: &'static str,
}

impl std::fmt::Display for InvalidArgumentError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}: `{}` must be present",
            self.operation, self.argument
        )
    }
}

impl std::error::Error for InvalidArgumentError {}

/// Represents errors that can occur in dictionary operations.
///
/// # Examples
///
/// ```rust
/// use avlmap::dictionary::{AvlTreeMap, DictionaryError};
///
/// let mut map: AvlTreeMap<i32, &str> = AvlTreeMap::new();
/// let error = map.try_insert(None, Some("orphan")).unwrap_err();
/// assert!(matches!(error, DictionaryError::InvalidArgument(_)));
/// assert!(map.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// A required key or value was absent.
    InvalidArgument(InvalidArgumentError),
}

impl DictionaryError {
    pub(crate) const fn missing(operation: &'static str, argument: &'static str) -> Self {
        Self::InvalidArgument(InvalidArgumentError {
            operation,
            argument,
        })
    }
}

impl std::fmt::Display for DictionaryError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(error) => write!(formatter, "invalid argument: {error}"),
        }
    }
}

impl std::error::Error for DictionaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidArgument(error) => Some(error),
        }
    }
}

impl From<InvalidArgumentError> for DictionaryError {
    fn from(error: InvalidArgumentError) -> Self {
        Self::InvalidArgument(error)
    }
}

/// A broken structural invariant found by [`AvlTreeMap::check_invariants`].
///
/// `depth` is the number of edges from the root to the offending node.
///
/// [`AvlTreeMap::check_invariants`]: super::AvlTreeMap::check_invariants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly between the bounds imposed by its ancestors.
    Ordering {
        /// Depth of the misplaced node.
        depth: usize,
    },
    /// A cached height disagrees with the height of the node's children.
    Height {
        /// Depth of the node.
        depth: usize,
        /// The cached height.
        stored: isize,
        /// `1 + max(left, right)`, with an empty subtree counting as -1.
        computed: isize,
    },
    /// The children's heights differ by more than one.
    Balance {
        /// Depth of the node.
        depth: usize,
        /// Left height minus right height.
        balance_factor: isize,
    },
    /// The stored entry count disagrees with the number of reachable nodes.
    Count {
        /// The count held by the map.
        stored: usize,
        /// The number of nodes reachable from the root.
        reachable: usize,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ordering { depth } => {
                write!(formatter, "key at depth {depth} is out of search order")
            }
            Self::Height {
                depth,
                stored,
                computed,
            } => write!(
                formatter,
                "node at depth {depth} caches height {stored} but its children imply {computed}"
            ),
            Self::Balance {
                depth,
                balance_factor,
            } => write!(
                formatter,
                "node at depth {depth} has balance factor {balance_factor}"
            ),
            Self::Count { stored, reachable } => write!(
                formatter,
                "map records {stored} entries but {reachable} are reachable"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
