//! Dictionaries: insert-or-update maps with exact lookup and enumeration.
//!
//! This module provides:
//!
//! - [`Dictionary`]: the minimal map capability that containers built on top
//!   of a dictionary (hash-table buckets, trie child maps) rely on
//! - [`AvlTreeMap`]: an ordered dictionary backed by a height-balanced binary
//!   search tree
//! - [`DictionaryError`] and [`InvariantViolation`]: the failure types
//!
//! `std::collections::HashMap` also implements [`Dictionary`], so an
//! `AvlTreeMap` and a hash map can be swapped wherever only the capability is
//! needed. With the `fxhash` or `ahash` features enabled,
//! [`FxHashDictionary`] and [`AHashDictionary`] name hash maps using those
//! hashers.
//!
//! # Examples
//!
//! ```rust
//! use avlmap::dictionary::{AvlTreeMap, Dictionary};
//! use std::collections::HashMap;
//!
//! fn count_words<D: Dictionary<String, usize>>(dictionary: &mut D, text: &str) {
//!     for word in text.split_whitespace() {
//!         let count = dictionary.find(&word.to_string()).copied().unwrap_or(0);
//!         dictionary.insert(word.to_string(), count + 1);
//!     }
//! }
//!
//! let mut ordered = AvlTreeMap::new();
//! let mut hashed = HashMap::new();
//! count_words(&mut ordered, "b a b c b");
//! count_words(&mut hashed, "b a b c b");
//!
//! assert_eq!(Dictionary::size(&ordered), 3);
//! assert_eq!(Dictionary::size(&hashed), 3);
//! assert_eq!(ordered.find("b"), Some(&3));
//!
//! // Only the tree promises ascending enumeration
//! let words: Vec<&String> = ordered.entries().map(|(word, _)| word).collect();
//! assert_eq!(words, vec!["a", "b", "c"]);
//! ```

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

mod avl_tree_map;
mod error;

pub use avl_tree_map::AvlTreeMap;
pub use avl_tree_map::IntoIter;
pub use avl_tree_map::Iter;
pub use avl_tree_map::IterMut;
pub use avl_tree_map::NodeRef;
pub use error::DictionaryError;
pub use error::InvalidArgumentError;
pub use error::InvariantViolation;

// =============================================================================
// Dictionary Capability
// =============================================================================

/// An insert-or-update map with exact lookup and enumeration.
///
/// This is the whole contract that collaborating containers depend on. It has
/// no removal: a dictionary only ever grows, until it is cleared.
///
/// # Laws
///
/// For any dictionary `d`, key `k` and value `v`:
///
/// 1. **Find after insert**: after `d.insert(k, v)`, `d.find(&k) == Some(&v)`.
/// 2. **Previous value**: `d.insert(k, v)` returns the value `k` held just
///    before the call, or `None` if `k` was absent.
/// 3. **Size**: `size` grows by one exactly when `insert` returns `None`.
/// 4. **Enumeration**: `entries` yields every stored pair exactly once, and
///    `entries().count() == size()`.
pub trait Dictionary<K, V> {
    /// Iterator over the stored pairs.
    type Entries<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Associates `value` with `key`, returning the value it replaced.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value associated with `key`, or `None` if it is absent.
    fn find(&self, key: &K) -> Option<&V>;

    /// Returns the number of stored pairs.
    fn size(&self) -> usize;

    /// Returns `true` if no pairs are stored.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Discards every stored pair.
    fn clear(&mut self);

    /// Enumerates the stored pairs.
    fn entries(&self) -> Self::Entries<'_>;
}

impl<K: Ord, V> Dictionary<K, V> for AvlTreeMap<K, V> {
    type Entries<'a>
        = Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        Self::insert(self, key, value)
    }

    #[inline]
    fn find(&self, key: &K) -> Option<&V> {
        Self::find(self, key)
    }

    #[inline]
    fn size(&self) -> usize {
        self.len()
    }

    #[inline]
    fn clear(&mut self) {
        Self::clear(self);
    }

    /// Enumerates the pairs in ascending key order.
    #[inline]
    fn entries(&self) -> Self::Entries<'_> {
        self.iter()
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> Dictionary<K, V> for HashMap<K, V, S> {
    type Entries<'a>
        = std::collections::hash_map::Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        Self::insert(self, key, value)
    }

    #[inline]
    fn find(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    #[inline]
    fn size(&self) -> usize {
        self.len()
    }

    #[inline]
    fn clear(&mut self) {
        Self::clear(self);
    }

    /// Enumerates the pairs in unspecified order.
    #[inline]
    fn entries(&self) -> Self::Entries<'_> {
        self.iter()
    }
}

// =============================================================================
// Fast Hash Aliases
// =============================================================================

/// A hash-based [`Dictionary`] using the `FxHash` algorithm.
#[cfg(feature = "fxhash")]
pub type FxHashDictionary<K, V> = HashMap<K, V, rustc_hash::FxBuildHasher>;

/// A hash-based [`Dictionary`] using the `aHash` algorithm.
#[cfg(feature = "ahash")]
pub type AHashDictionary<K, V> = HashMap<K, V, ahash::RandomState>;

// =============================================================================
// Tests
// =============================================================================
