//! Two-way bindings between the declarative caller and the engine.

use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// A shared, mutable value owned by the caller and written to by the map.
///
/// Clones refer to the same value. A constant binding ignores writes, for callers that only
/// want to push a value into the map.
pub struct Binding<T> {
    value: Arc<Mutex<T>>,
    constant: bool,
}

impl<T> Binding<T> {
    pub fn new(value: T) -> Binding<T> {
        Binding {
            value: Arc::new(Mutex::new(value)),
            constant: false,
        }
    }

    pub fn constant(value: T) -> Binding<T> {
        Binding {
            value: Arc::new(Mutex::new(value)),
            constant: true,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn set(&self, value: T) {
        if !self.constant {
            *self.value.lock() = value;
        }
    }

    /// Runs a function with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.lock())
    }

    /// Returns true if both bindings refer to the same value.
    pub fn ptr_eq(&self, other: &Binding<T>) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl<T: Clone> Binding<T> {
    pub fn get(&self) -> T {
        self.value.lock().clone()
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Binding {
            value: Arc::clone(&self.value),
            constant: self.constant,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &*self.value.lock())
            .field("constant", &self.constant)
            .finish()
    }
}

#[test]
fn test_binding_sharing() {
    let binding = Binding::new(1);
    let clone = binding.clone();
    clone.set(2);
    assert_eq!(binding.get(), 2);
    assert!(binding.ptr_eq(&clone));
    assert!(!binding.ptr_eq(&Binding::new(2)));
    assert_eq!(binding.with(|v| v * 10), 20);

    assert!(!binding.is_constant());
    let constant = Binding::constant(1);
    assert!(constant.is_constant());
    assert!(constant.clone().is_constant(), "clones stay constant");
    constant.clone().set(2);
    assert_eq!(constant.get(), 1, "constant bindings ignore writes");
}
