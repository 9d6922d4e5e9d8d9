//! Type-erased event payload with checked narrowing.
//!
//! The original implementation carries `Event.Msg any` — Go's empty
//! interface, which can legally be `nil`. `unwrapEvent[T](e)` performs an
//! unchecked type assertion. In Rust we model the same contract with an
//! `Arc<dyn Any + Send + Sync>` wrapped in an `Option` (so "absent" is a
//! representable, checkable state), and make the narrowing in
//! [`Payload::downcast`] a checked operation that fails cleanly instead of
//! panicking. `Arc` rather than `Box` because one event's payload is
//! fanned out to every matching subscriber without being copied: the
//! dispatcher clones the `Event` cheaply per subscriber while all clones
//! still deref to the same value.

// Layer 1: Standard library imports
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, `Send + Sync` value carried by an [`Event`](crate::bus::Event).
///
/// Constructed from any concrete `T: Any + Send + Sync`. May also be
/// constructed empty via [`Payload::none`], mirroring a `nil` Go
/// interface value; an empty payload fails [`Event::is_valid`](crate::bus::Event::is_valid).
#[derive(Clone)]
pub struct Payload {
    inner: Option<Arc<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl Payload {
    /// Wrap a concrete value as an opaque payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// An absent payload (Go's `nil` interface equivalent).
    pub fn none() -> Self {
        Self {
            inner: None,
            type_name: "<none>",
        }
    }

    /// True when this payload carries no value.
    pub fn is_none(&self) -> bool {
        self.inner.is_none()
    }

    /// The `type_name` of the wrapped value, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn type_id(&self) -> Option<TypeId> {
        self.inner.as_deref().map(Any::type_id)
    }

    /// Narrow the payload to `T`, by reference.
    ///
    /// Returns `None` if the payload is absent or holds a different
    /// concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_deref().and_then(<dyn Any>::downcast_ref)
    }

    /// Narrow the payload to `T`, by value.
    ///
    /// Fails if the payload is absent, holds a different concrete type,
    /// or (since a payload may be shared across several subscribers) is
    /// not the sole owner of its value. Returns the original `Payload`
    /// back in `Err` so callers can recover it, e.g. to report a
    /// type-mismatch error that names the expected and actual types.
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<T, Payload> {
        let expected = TypeId::of::<T>();
        if self.type_id() != Some(expected) {
            return Err(self);
        }

        match self.inner {
            Some(arc) => match arc.downcast::<T>() {
                Ok(value) => match Arc::try_unwrap(value) {
                    Ok(value) => Ok(value),
                    Err(arc) => Err(Self {
                        inner: Some(arc),
                        type_name: self.type_name,
                    }),
                },
                Err(arc) => Err(Self {
                    inner: Some(arc),
                    type_name: self.type_name,
                }),
            },
            None => Err(self),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .field("is_none", &self.is_none())
            .finish()
    }
}

impl<T: Any + Send + Sync> From<T> for Payload {
    fn from(value: T) -> Self {
        Payload::new(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_unwraps_concrete_type() {
        let payload = Payload::new(42_u32);
        assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
        assert_eq!(payload.downcast::<u32>().unwrap(), 42);
    }

    #[test]
    fn mismatched_downcast_returns_payload_back() {
        let payload = Payload::new("hello".to_string());
        let result = payload.downcast::<u32>();
        assert!(result.is_err());
    }

    #[test]
    fn none_payload_has_no_value() {
        let payload = Payload::none();
        assert!(payload.is_none());
        assert!(payload.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn from_impl_wraps_value() {
        let payload: Payload = "test1".to_string().into();
        assert_eq!(payload.downcast_ref::<String>(), Some(&"test1".to_string()));
    }
}
