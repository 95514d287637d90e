//! Type class traits for folding over containers.
//!
//! - [`TypeConstructor`]: emulates higher-kinded types with a generic
//!   associated type, so a trait can talk about "the same container holding
//!   a different element type"
//! - [`Foldable`]: collapses a container into a summary value, visiting the
//!   elements in the container's natural order
//!
//! [`AvlTreeMap`](crate::dictionary::AvlTreeMap) is `Foldable` over its values
//! (in ascending key order) when the `dictionary` feature is enabled.
//!
//! # Examples
//!
//! ```rust
//! use avlmap::typeclass::Foldable;
//!
//! let values = vec![1, 2, 3];
//! assert_eq!(values.fold_left(0, |total, value| total + value), 6);
//! ```

mod foldable;
mod higher;

pub use foldable::Foldable;
pub use higher::TypeConstructor;
