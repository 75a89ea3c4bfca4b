#![forbid(unsafe_code)]

//! Scoped values shared with descendants.
//!
//! A [`Context`] is a stack of provider scopes. A parent provides a value for
//! the duration of a closure; anything rendered inside that closure can
//! consume the nearest enclosing value of a given type without it being
//! threaded through every intermediate call.
//!
//! ```
//! use sizer_runtime::context::Context;
//!
//! #[derive(Debug, PartialEq)]
//! struct UserName(&'static str);
//!
//! let mut cx = Context::new();
//! let seen = cx.provide(UserName("Hemanth"), |cx| {
//!     // Intermediate levels never mention `UserName`.
//!     cx.consume::<UserName>().map(|n| n.0)
//! });
//! assert_eq!(seen, Some("Hemanth"));
//! assert!(cx.consume::<UserName>().is_none());
//! ```

use std::any::{Any, type_name};

struct Scope {
    type_name: &'static str,
    value: Box<dyn Any>,
}

/// A stack of provided values.
#[derive(Default)]
pub struct Context {
    scopes: Vec<Scope>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.scopes.iter().map(|s| s.type_name))
            .finish()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide `value` to everything that runs inside `f`.
    ///
    /// The scope is removed when `f` returns, so consumers outside it see the
    /// previous value (or nothing).
    pub fn provide<T: 'static, R>(&mut self, value: T, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scopes.push(Scope {
            type_name: type_name::<T>(),
            value: Box::new(value),
        });
        let depth = self.scopes.len();
        let out = f(self);
        self.scopes.truncate(depth - 1);
        out
    }

    /// The nearest enclosing value of type `T`, if any provider is active.
    pub fn consume<T: 'static>(&self) -> Option<&T> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.value.downcast_ref::<T>())
    }

    /// The nearest enclosing value of type `T`, or `default` outside any provider.
    pub fn consume_or<'a, T: 'static>(&'a self, default: &'a T) -> &'a T {
        self.consume::<T>().unwrap_or(default)
    }

    /// Number of active provider scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
