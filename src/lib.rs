//! # avlmap
//!
//! A height-balanced ordered dictionary for Rust.
//!
//! ## Overview
//!
//! - **Dictionaries**: [`AvlTreeMap`](dictionary::AvlTreeMap), an AVL tree
//!   keyed by any `Ord` type, and the [`Dictionary`](dictionary::Dictionary)
//!   capability it shares with `std::collections::HashMap`
//! - **Type Classes**: `TypeConstructor` and `Foldable`, so dictionaries can be
//!   folded like any other container
//!
//! ## Feature Flags
//!
//! - `dictionary`: `AvlTreeMap` and the `Dictionary` trait (default)
//! - `typeclass`: type class traits (default)
//! - `fxhash`: `FxHashDictionary` alias backed by `rustc-hash`
//! - `ahash`: `AHashDictionary` alias backed by `ahash`
//! - `full`: enable all features
//!
//! ## Logging
//!
//! Rebalancing and rejected insertions are reported through `tracing`
//! events at `trace` and `debug` level. The crate never installs a subscriber.
//!
//! ## Example
//!
//! ```rust
//! use avlmap::prelude::*;
//!
//! let mut map = AvlTreeMap::new();
//! for (index, word) in ["pear", "apple", "fig"].into_iter().enumerate() {
//!     map.insert(word, index);
//! }
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["apple", "fig", "pear"]);
//! assert_eq!(map.check_invariants(), Ok(()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use avlmap::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "dictionary")]
    pub use crate::dictionary::*;

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;
}

#[cfg(feature = "dictionary")]
pub mod dictionary;

#[cfg(feature = "typeclass")]
pub mod typeclass;
