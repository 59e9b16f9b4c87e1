//! Shell-lifetime session state shared by every command invocation.

use std::any::Any;
use std::collections::HashMap;

/// Typed key/value state that survives between shell turns.
///
/// Values are stored behind `Any` and read back by type; asking for a key
/// with the wrong type is the same as asking for a missing key.
#[derive(Default)]
pub struct Context {
    values: HashMap<String, Box<dyn Any>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Value under `key`, inserting `T::default()` when it is missing or of another type.
    ///
    /// `None` means the slot refused the fresh value, which a `HashMap` never does.
    pub fn get_or_default<T: Any + Default>(&mut self, key: &str) -> Option<&mut T> {
        let slot = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Box::new(T::default()));
        if !(**slot).is::<T>() {
            *slot = Box::new(T::default());
        }
        (**slot).downcast_mut::<T>()
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}
