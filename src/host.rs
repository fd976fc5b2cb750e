//! Host-object registry and callout dispatch.
//!
//! Foreign values never enter the term language directly. The host
//! registers an object and receives an opaque handle; terms carry only
//! the handle, and the search engine routes method-call goals back
//! through the registry. This keeps term lifetimes decoupled from any
//! host runtime.

use std::sync::{Arc, RwLock};

use crate::error::RuntimeError;
use crate::term::Term;

/// Opaque index of a registered host object.
pub type Handle = u64;

/// A host-provided object the engine can call methods on.
///
/// `call` is synchronous from the engine's perspective: resolution does
/// not proceed past a callout until it returns a term or an error.
pub trait HostObject: Send + Sync {
    /// Name used in diagnostics, e.g. `"User"`.
    fn type_name(&self) -> &str;

    /// Invoke a method with already-resolved argument terms.
    fn call(&self, method: &str, args: &[Term]) -> Result<Term, RuntimeError>;
}

/// Registry of host objects, shared between the engine and live query
/// sessions.
///
/// Registration may interleave with running queries; handles are never
/// reused or invalidated.
#[derive(Default)]
pub struct HostRegistry {
    objects: RwLock<Vec<Arc<dyn HostObject>>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object, returning its opaque handle.
    pub fn register(&self, object: Box<dyn HostObject>) -> Handle {
        let mut objects = self
            .objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        objects.push(Arc::from(object));
        (objects.len() - 1) as Handle
    }

    /// Dispatch a method call to the object behind `handle`.
    pub fn call(&self, handle: Handle, method: &str, args: &[Term]) -> Result<Term, RuntimeError> {
        let object = {
            let objects = self
                .objects
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            objects
                .get(handle as usize)
                .cloned()
                .ok_or(RuntimeError::UnknownObject(handle))?
        };
        object.call(method, args)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
