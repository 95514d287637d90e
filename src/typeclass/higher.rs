//! Higher-kinded type emulation through generic associated types.
//!
//! Rust cannot abstract over a type constructor such as `Vec<_>` directly.
//! [`TypeConstructor`] records the element type a container is applied to and
//! how to name the same container applied to another type.

/// A type constructor applied to some element type.
///
/// # Laws
///
/// 1. **Consistency**: `<F as TypeConstructor>::WithType<F::Inner>` is `F`.
///
/// # Examples
///
/// ```rust
/// use avlmap::typeclass::TypeConstructor;
///
/// fn empty_like<T: TypeConstructor>(_: &T) -> T::WithType<String>
/// where
///     T::WithType<String>: Default,
/// {
///     Default::default()
/// }
///
/// let numbers = vec![1, 2, 3];
/// let strings: Vec<String> = empty_like(&numbers);
/// assert!(strings.is_empty());
/// ```
pub trait TypeConstructor {
    /// The element type this constructor is applied to.
    type Inner;

    /// The same constructor applied to `B`.
    type WithType<B>: TypeConstructor<Inner = B>;
}

impl<A> TypeConstructor for Option<A> {
    type Inner = A;
    type WithType<B> = Option<B>;
}

impl<T> TypeConstructor for Vec<T> {
    type Inner = T;
    type WithType<B> = Vec<B>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner_is<T: TypeConstructor<Inner = I>, I>(_: &T) {}

    #[test]
    fn test_option_inner_type() {
        inner_is::<Option<u8>, u8>(&Some(1));
    }

    #[test]
    fn test_vec_with_type_rebinds_element() {
        let rebound: <Vec<i32> as TypeConstructor>::WithType<&str> = vec!["a"];
        assert_eq!(rebound, vec!["a"]);
    }
}
