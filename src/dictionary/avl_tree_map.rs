//! Mutable ordered map based on a height-balanced (AVL) binary search tree.
//!
//! This module provides [`AvlTreeMap`], an ordered dictionary that keeps its
//! height logarithmic in the number of entries by caching the height of every
//! node and rotating subtrees whenever an insertion unbalances them.
//!
//! # Overview
//!
//! - O(log N) insert (insert-or-update)
//! - O(log N) find
//! - O(N) in-order iteration, O(log N) extra space
//! - O(1) len and `is_empty`
//!
//! Entries are never removed individually; the only way to shrink a map is
//! [`AvlTreeMap::clear`].
//!
//! # Examples
//!
//! ```rust
//! use avlmap::dictionary::AvlTreeMap;
//!
//! let mut map = AvlTreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Reinserting a key hands back the value it replaced
//! assert_eq!(map.insert(2, "TWO"), Some("two"));
//! assert_eq!(map.find(&2), Some(&"TWO"));
//! ```
//!
//! # Internal Structure
//!
//! Every node caches its height: the number of edges on the longest path down
//! to an empty child. An empty subtree has height -1, so a leaf has height 0.
//! After every public operation:
//!
//! 1. Keys in a left subtree are strictly less than the node's key, keys in a
//!    right subtree strictly greater
//! 2. Every cached height equals `1 + max(height(left), height(right))`
//! 3. The two child heights of every node differ by at most one
//! 4. The stored length equals the number of reachable nodes

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::mem;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::error::{DictionaryError, InvariantViolation};

/// Height of an empty subtree.
const EMPTY_HEIGHT: isize = -1;

/// Inline capacity of the traversal stacks.
///
/// An AVL tree of height 48 holds more than two billion entries, so the
/// stacks only spill to the heap for enormous maps.
const SPINE_CAPACITY: usize = 48;

// =============================================================================
// Node Definition
// =============================================================================

type Link<K, V> = Option<Box<Node<K, V>>>;

/// Internal node structure for the AVL tree.
#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    height: isize,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// Returns the cached height of a subtree, or -1 when it is empty.
fn height_of<K, V>(link: &Link<K, V>) -> isize {
    link.as_ref().map_or(EMPTY_HEIGHT, |node| node.height)
}

impl<K, V> Node<K, V> {
    /// Creates a node with no children.
    const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 0,
            left: None,
            right: None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    /// Left height minus right height.
    fn balance_factor(&self) -> isize {
        height_of(&self.left) - height_of(&self.right)
    }

    /// Rotates the subtree to the right around this node.
    ///
    /// The left child becomes the subtree root and adopts this node as its
    /// right child; its former right subtree moves across to become this
    /// node's left subtree. Heights are recomputed bottom-up.
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let Some(mut pivot) = self.left.take() else {
            return self;
        };
        self.left = pivot.right.take();
        self.update_height();
        pivot.right = Some(self);
        pivot.update_height();
        pivot
    }

    /// Rotates the subtree to the left around this node.
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let Some(mut pivot) = self.right.take() else {
            return self;
        };
        self.right = pivot.left.take();
        self.update_height();
        pivot.left = Some(self);
        pivot.update_height();
        pivot
    }
}

// =============================================================================
// Rebalancing
// =============================================================================

/// The corrective transformation applied to an unbalanced node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Rotation {
    /// Left-heavy, key went into the left child's left subtree.
    Right,
    /// Right-heavy, key went into the right child's right subtree.
    Left,
    /// Left-heavy, key went into the left child's right subtree.
    LeftRight,
    /// Right-heavy, key went into the right child's left subtree.
    RightLeft,
}

impl Rotation {
    /// Picks the rotation for a node from its balance factor and from how the
    /// inserted key compared against the child on the heavy side.
    const fn select(balance_factor: isize, child_ordering: Ordering) -> Option<Self> {
        match (balance_factor, child_ordering) {
            (2.., Ordering::Less) => Some(Self::Right),
            (2.., Ordering::Greater) => Some(Self::LeftRight),
            (..=-2, Ordering::Greater) => Some(Self::Left),
            (..=-2, Ordering::Less) => Some(Self::RightLeft),
            _ => None,
        }
    }

    fn apply<K, V>(self, mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match self {
            Self::Right => node.rotate_right(),
            Self::Left => node.rotate_left(),
            Self::LeftRight => {
                node.left = node.left.take().map(Node::rotate_left);
                node.rotate_right()
            }
            Self::RightLeft => {
                node.right = node.right.take().map(Node::rotate_right);
                node.rotate_left()
            }
        }
    }
}

/// What an insertion did to the subtree it descended into.
enum Insertion<V> {
    /// A new node was linked in below without any rotation. `ordering` is how
    /// the inserted key compared against the subtree root (`Equal` when the
    /// subtree root is the new node itself).
    Linked { ordering: Ordering },
    /// A rotation below restored the subtree to its height before insertion.
    Rebalanced,
    /// The key was already present; its previous value is carried up.
    Replaced(V),
}

// =============================================================================
// AvlTreeMap Definition
// =============================================================================

/// A mutable ordered map based on an AVL tree.
///
/// Keys must implement `Ord`. Each distinct key maps to exactly one value;
/// inserting an existing key replaces its value in place and hands the old one
/// back. Iteration is in ascending key order.
///
/// # Time Complexity
///
/// | Operation       | Complexity |
/// |-----------------|------------|
/// | `new`           | O(1)       |
/// | `insert`        | O(log N)   |
/// | `find` / `get`  | O(log N)   |
/// | `contains_key`  | O(log N)   |
/// | `first`/`last`  | O(log N)   |
/// | `iter`          | O(N)       |
/// | `len`           | O(1)       |
/// | `height`        | O(1)       |
///
/// # Examples
///
/// ```rust
/// use avlmap::dictionary::AvlTreeMap;
///
/// let mut map = AvlTreeMap::new();
/// for key in [10, 20, 30] {
///     map.insert(key, key * 100);
/// }
///
/// // Ascending insertion still yields a balanced tree
/// let root = map.root().unwrap();
/// assert_eq!(root.key(), &20);
/// assert_eq!(map.height(), 1);
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    /// Root node of the tree
    root: Link<K, V>,
    /// Number of entries
    length: usize,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, String> = AvlTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the height of the tree: -1 when empty, 0 for a single entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.height(), -1);
    /// map.insert(1, ());
    /// assert_eq!(map.height(), 0);
    /// ```
    #[must_use]
    pub fn height(&self) -> isize {
        height_of(&self.root)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.length = 0;
    }

    /// Returns a read-only view of the root node, or `None` if the map is empty.
    ///
    /// The view exposes the tree's shape so that callers can inspect how the
    /// entries are arranged; it cannot be used to modify the tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.as_deref().map(|node| NodeRef { node })
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, &str> = [(3, "three"), (1, "one"), (2, "two")]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(map.first_key_value(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// The iterator is lazy: it walks the tree one entry at a time and holds
    /// only the path of pending ancestors. Calling `iter` again starts a fresh
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    /// let entries: Vec<(&i32, &char)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b'), (&3, &'c')]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iterator = Iter {
            pending: SmallVec::new(),
            remaining: self.length,
        };
        iterator.descend(self.root.as_deref());
        iterator
    }

    /// Returns an iterator over entries in ascending key order with mutable
    /// access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let mut iterator = IterMut {
            pending: SmallVec::new(),
            remaining: self.length,
        };
        iterator.descend(self.root.as_deref_mut());
        iterator
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, i32> = (1..=3).map(|key| (key, key * 10)).collect();
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an iterator over mutable values in ascending key order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|(_, value)| value)
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the key is new, a node is created and `None` is returned. If the key
    /// already exists, its value is replaced in place, the previous value is
    /// returned and the shape of the tree is left untouched.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match Self::insert_into_link(&mut self.root, key, value) {
            Insertion::Replaced(previous) => Some(previous),
            Insertion::Linked { .. } | Insertion::Rebalanced => {
                self.length += 1;
                None
            }
        }
    }

    /// Inserts a key-value pair whose parts may be missing.
    ///
    /// This is the checked entry point for callers whose inputs arrive as
    /// `Option`s. Both parts must be present; the check happens before the
    /// tree is touched.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::InvalidArgument`] if `key` or `value` is
    /// `None`. The map is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.try_insert(Some(1), Some("one")), Ok(None));
    /// assert_eq!(map.try_insert(Some(1), Some("uno")), Ok(Some("one")));
    /// assert!(map.try_insert(Some(2), None).is_err());
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn try_insert(
        &mut self,
        key: Option<K>,
        value: Option<V>,
    ) -> Result<Option<V>, DictionaryError> {
        let Some(key) = key else {
            debug!(argument = "key", "rejected insertion with missing argument");
            return Err(DictionaryError::missing("try_insert", "key"));
        };
        let Some(value) = value else {
            debug!(argument = "value", "rejected insertion with missing argument");
            return Err(DictionaryError::missing("try_insert", "value"));
        };
        Ok(self.insert(key, value))
    }

    /// Recursive helper for insert.
    ///
    /// Descends from `link`, links in a new leaf or replaces an existing value,
    /// and on the way back up recomputes heights and rotates any node whose
    /// children's heights differ by more than one.
    fn insert_into_link(link: &mut Link<K, V>, key: K, value: V) -> Insertion<V> {
        let node = match link {
            None => {
                *link = Some(Box::new(Node::leaf(key, value)));
                return Insertion::Linked {
                    ordering: Ordering::Equal,
                };
            }
            Some(node) => node,
        };

        let ordering = key.cmp(&node.key);
        let below = match ordering {
            Ordering::Less => Self::insert_into_link(&mut node.left, key, value),
            Ordering::Greater => Self::insert_into_link(&mut node.right, key, value),
            Ordering::Equal => {
                return Insertion::Replaced(mem::replace(&mut node.value, value));
            }
        };

        let child_ordering = match below {
            Insertion::Replaced(previous) => return Insertion::Replaced(previous),
            Insertion::Rebalanced => {
                node.update_height();
                return Insertion::Rebalanced;
            }
            Insertion::Linked { ordering } => ordering,
        };

        let balance_factor = node.balance_factor();
        match Rotation::select(balance_factor, child_ordering) {
            Some(rotation) => {
                trace!(?rotation, balance_factor, "rebalancing subtree");
                if let Some(unbalanced) = link.take() {
                    *link = Some(rotation.apply(unbalanced));
                }
                Insertion::Rebalanced
            }
            None => {
                node.update_height();
                Insertion::Linked { ordering }
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    /// A missing key yields `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.find("hello"), Some(&42));
    /// assert_eq!(map.find("world"), None);
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            node = match key.cmp(current.key.borrow()) {
                Ordering::Less => current.left.as_deref(),
                Ordering::Greater => current.right.as_deref(),
                Ordering::Equal => return Some(&current.value),
            };
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// This is an alias for [`find`](Self::find), named after the standard
    /// library's maps.
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Only the value can be changed through the reference; the tree's shape
    /// is unaffected.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref_mut();
        while let Some(current) = node {
            node = match key.cmp(current.key.borrow()) {
                Ordering::Less => current.left.as_deref_mut(),
                Ordering::Greater => current.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut current.value),
            };
        }
        None
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Recomputes every structural invariant of the tree from scratch.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found in a pre-order walk.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::dictionary::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<u32, u32> = (0..1000).map(|key| (key, key)).collect();
    /// assert_eq!(map.check_invariants(), Ok(()));
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let (_, reachable) = Self::check_subtree(self.root.as_deref(), None, None, 0)?;
        if reachable == self.length {
            Ok(())
        } else {
            Err(InvariantViolation::Count {
                stored: self.length,
                reachable,
            })
        }
    }

    /// Returns `(height, node count)` of a subtree whose keys must lie strictly
    /// between `lower` and `upper`.
    fn check_subtree(
        node: Option<&Node<K, V>>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
    ) -> Result<(isize, usize), InvariantViolation> {
        let Some(node) = node else {
            return Ok((EMPTY_HEIGHT, 0));
        };

        let above_lower = lower.is_none_or(|bound| node.key > *bound);
        let below_upper = upper.is_none_or(|bound| node.key < *bound);
        if !(above_lower && below_upper) {
            return Err(InvariantViolation::Ordering { depth });
        }

        let (left_height, left_count) =
            Self::check_subtree(node.left.as_deref(), lower, Some(&node.key), depth + 1)?;
        let (right_height, right_count) =
            Self::check_subtree(node.right.as_deref(), Some(&node.key), upper, depth + 1)?;

        let computed = 1 + left_height.max(right_height);
        if node.height != computed {
            return Err(InvariantViolation::Height {
                depth,
                stored: node.height,
                computed,
            });
        }

        let balance_factor = left_height - right_height;
        if balance_factor.abs() > 1 {
            return Err(InvariantViolation::Balance {
                depth,
                balance_factor,
            });
        }

        Ok((computed, left_count + right_count + 1))
    }
}

// =============================================================================
// Node View
// =============================================================================

/// A read-only view of one node of an [`AvlTreeMap`].
///
/// Obtained from [`AvlTreeMap::root`] and navigated with [`left`](Self::left)
/// and [`right`](Self::right).
///
/// # Examples
///
/// ```rust
/// use avlmap::dictionary::AvlTreeMap;
///
/// let map: AvlTreeMap<i32, ()> = [(30, ()), (10, ()), (20, ())].into_iter().collect();
/// let root = map.root().unwrap();
/// assert_eq!(root.key(), &20);
/// assert_eq!(root.left().map(|node| *node.key()), Some(10));
/// assert_eq!(root.right().map(|node| *node.key()), Some(30));
/// assert_eq!(root.balance_factor(), 0);
/// ```
pub struct NodeRef<'a, K, V> {
    node: &'a Node<K, V>,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    /// The node's key.
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.node.key
    }

    /// The node's value.
    #[must_use]
    pub fn value(&self) -> &'a V {
        &self.node.value
    }

    /// The cached height of the subtree rooted here (0 for a leaf).
    #[must_use]
    pub fn height(&self) -> isize {
        self.node.height
    }

    /// Left subtree height minus right subtree height.
    #[must_use]
    pub fn balance_factor(&self) -> isize {
        self.node.balance_factor()
    }

    /// The left child, if any.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.node.left.as_deref().map(|node| NodeRef { node })
    }

    /// The right child, if any.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.node.right.as_deref().map(|node| NodeRef { node })
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("key", &self.node.key)
            .field("value", &self.node.value)
            .field("height", &self.node.height)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of an [`AvlTreeMap`], in ascending order.
pub struct Iter<'a, K, V> {
    /// Ancestors whose own entry and right subtree are still to be visited.
    pending: SmallVec<[&'a Node<K, V>; SPINE_CAPACITY]>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Pushes `node` and its chain of left descendants.
    fn descend(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(current) = node {
            self.pending.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;
        self.descend(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            pending: self.pending.clone(),
            remaining: self.remaining,
        }
    }
}

/// A node split into the parts [`IterMut`] still needs.
type PendingMut<'a, K, V> = (&'a K, &'a mut V, Option<&'a mut Node<K, V>>);

/// A mutable iterator over the entries of an [`AvlTreeMap`], in ascending order.
pub struct IterMut<'a, K, V> {
    pending: SmallVec<[PendingMut<'a, K, V>; SPINE_CAPACITY]>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    fn descend(&mut self, mut node: Option<&'a mut Node<K, V>>) {
        while let Some(current) = node {
            let Node {
                key,
                value,
                left,
                right,
                ..
            } = current;
            self.pending.push((&*key, value, right.as_deref_mut()));
            node = left.as_deref_mut();
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value, right) = self.pending.pop()?;
        self.descend(right);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of an [`AvlTreeMap`], in ascending order.
pub struct IntoIter<K, V> {
    pending: SmallVec<[Box<Node<K, V>>; SPINE_CAPACITY]>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    fn descend(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.pending.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.pending.pop()?;
        self.descend(node.right.take());
        self.remaining -= 1;
        let Node { key, value, .. } = *node;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for AvlTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut iterator = IntoIter {
            pending: SmallVec::new(),
            remaining: self.length,
        };
        iterator.descend(self.root);
        iterator
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut AvlTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Two maps are equal when they hold the same entries, regardless of the
/// order in which those entries were inserted.
impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

/// Hashes the length followed by every entry in key order, so equal maps
/// hash equally whatever their internal shape.
impl<K: Hash, V: Hash> Hash for AvlTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for AvlTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

/// An `AvlTreeMap` is treated as a container of its values, with the key type
/// held fixed.
#[cfg(feature = "typeclass")]
impl<K, V> crate::typeclass::TypeConstructor for AvlTreeMap<K, V> {
    type Inner = V;
    type WithType<B> = AvlTreeMap<K, B>;
}

/// Folds over the values in ascending key order.
#[cfg(feature = "typeclass")]
impl<K, V> crate::typeclass::Foldable for AvlTreeMap<K, V> {
    fn fold_left<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(B, V) -> B,
    {
        self.into_iter()
            .fold(init, |accumulator, (_, value)| function(accumulator, value))
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(V, B) -> B,
    {
        let values: Vec<V> = self.into_iter().map(|(_, value)| value).collect();
        values
            .into_iter()
            .rev()
            .fold(init, |accumulator, value| function(value, accumulator))
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

static_assertions::assert_impl_all!(AvlTreeMap<i32, String>: Send, Sync);
static_assertions::assert_impl_all!(Iter<'static, i32, String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
