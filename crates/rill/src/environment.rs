//! Lexical environments: chains of scope frames.
//!
//! A frame maps names to values and links to at most one enclosing frame;
//! the global frame has none. Frames only ever link parentward, so the chain
//! is a tree and plain reference counting is enough to manage it. A frame
//! outlives its block when a closure captured it, which is the entire point
//! of closures.

use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{intern::Symbol, value::Value};

/// Shared handle to a scope frame.
pub(crate) type EnvRef = Rc<RefCell<Environment>>;

/// One scope frame.
///
/// Bindings keep their definition order so session inspection can list
/// globals in the order they appeared.
#[derive(Debug, Default)]
pub(crate) struct Environment {
    values: IndexMap<Symbol, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A frame with no enclosing scope. Only the globals frame is built
    /// this way.
    pub fn global() -> EnvRef {
        Rc::new(RefCell::new(Self::default()))
    }

    /// A fresh frame nested inside `enclosing`.
    pub fn nested(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Self {
            values: IndexMap::new(),
            enclosing: Some(Rc::clone(enclosing)),
        }))
    }

    /// Binds `name` in this frame, replacing any existing binding.
    ///
    /// Redefinition is allowed here on purpose: globals may be re-declared.
    /// The resolver rejects duplicate declarations in local scopes before
    /// execution ever starts.
    pub fn define(&mut self, name: Symbol, value: Value) {
        self.values.insert(name, value);
    }

    /// Looks `name` up in this frame, then outward through the chain.
    pub fn get(&self, name: Symbol) -> Option<Value> {
        if let Some(value) = self.values.get(&name) {
            return Some(value.clone());
        }
        self.enclosing.as_ref().and_then(|parent| parent.borrow().get(name))
    }

    /// Assigns to an existing binding in this frame or an enclosing one.
    ///
    /// Returns false when the name is bound nowhere in the chain; assignment
    /// never creates a binding.
    pub fn assign(&mut self, name: Symbol, value: Value) -> bool {
        if let Some(slot) = self.values.get_mut(&name) {
            *slot = value;
            return true;
        }
        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => false,
        }
    }

    /// Bindings of this frame in definition order.
    pub fn bindings(&self) -> impl Iterator<Item = (Symbol, Value)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value.clone()))
    }
}

/// Walks exactly `distance` enclosing links from `env`.
///
/// # Panics
/// Panics if the chain is shorter than `distance`. Resolved references are
/// only produced for frames the resolver proved exist, so a short chain is
/// an interpreter bug, not a user error.
fn ancestor(env: &EnvRef, distance: usize) -> EnvRef {
    let mut current = Rc::clone(env);
    for _ in 0..distance {
        let parent = current
            .borrow()
            .enclosing
            .as_ref()
            .map(Rc::clone)
            .expect("resolved scope distance exceeds environment chain");
        current = parent;
    }
    current
}

/// Reads `name` directly from the frame `distance` links up the chain.
pub(crate) fn get_at(env: &EnvRef, distance: usize, name: Symbol) -> Option<Value> {
    ancestor(env, distance).borrow().values.get(&name).cloned()
}

/// Writes `name` directly in the frame `distance` links up the chain.
pub(crate) fn assign_at(env: &EnvRef, distance: usize, name: Symbol, value: Value) -> bool {
    let frame = ancestor(env, distance);
    let mut frame = frame.borrow_mut();
    match frame.values.get_mut(&name) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}
