//! Exhaustive variant dispatch.
//!
//! ```ignore
//! let area = shape.match_with(
//!     &Handlers::new()
//!         .on("Circle", |_, c| PI * radius(c).powi(2))
//!         .on("Square", |_, s| side(s).powi(2)),
//! )?;
//! ```
//!
//! Every declared variant needs a handler. A missing one fails the call
//! before any handler runs, no matter which variant the instance is.

use std::collections::HashMap;
use std::fmt;

use tagtype_foundation::{Error, ErrorKind, Instance, Result};

type Handler<'h, R> = Box<dyn Fn(&Handlers<'h, R>, &Instance) -> R + 'h>;

/// Handlers keyed by variant name.
///
/// Each handler receives the whole handler set as well as the instance, so a
/// handler can delegate to a sibling through [`Handlers::call`].
pub struct Handlers<'h, R> {
    handlers: HashMap<String, Handler<'h, R>>,
}

impl<'h, R> Handlers<'h, R> {
    /// Creates an empty handler set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Adds (or replaces) the handler for a variant.
    #[must_use]
    pub fn on<F>(mut self, variant: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Handlers<'h, R>, &Instance) -> R + 'h,
    {
        self.handlers.insert(variant.into(), Box::new(handler));
        self
    }

    /// Returns true if a handler for `variant` exists.
    #[must_use]
    pub fn contains(&self, variant: &str) -> bool {
        self.handlers.contains_key(variant)
    }

    /// Runs the handler for `variant` directly, without any checks.
    pub fn call(&self, variant: &str, instance: &Instance) -> Option<R> {
        self.handlers.get(variant).map(|h| h(self, instance))
    }
}

impl<R> Default for Handlers<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Handlers<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("Handlers").field("variants", &names).finish()
    }
}

/// Exhaustive dispatch on a sum-type value.
pub trait Match {
    /// Calls the handler for this value's variant.
    ///
    /// # Errors
    ///
    /// Returns `NotSumType` for a single-variant value, or an exhaustiveness
    /// failure listing every declared variant without a handler.
    fn match_with<R>(&self, handlers: &Handlers<'_, R>) -> Result<R>;
}

impl Match for Instance {
    fn match_with<R>(&self, handlers: &Handlers<'_, R>) -> Result<R> {
        let shape = self.shape();
        if !shape.is_sum() {
            return Err(Error::new(ErrorKind::NotSumType(shape.name.to_string())));
        }
        let missing: Vec<String> = shape
            .variants
            .iter()
            .filter(|v| !handlers.contains(&v.name))
            .map(|v| v.name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::exhaustiveness(shape.name.to_string(), missing));
        }
        let tag = &self.variant_shape().name;
        handlers
            .call(tag, self)
            .ok_or_else(|| Error::exhaustiveness(shape.name.to_string(), vec![tag.to_string()]))
    }
}
