//! Symbol table: two scopes (class-wide, subroutine-local) searched in order.
//!
//! The class scope outlives many subroutine scopes, so it is modeled as a
//! separate store that [`SymbolTable::start_subroutine`] never touches; only
//! the subroutine scope is cleared between subroutines.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Local,
}

#[derive(Debug, Clone)]
struct Entry {
    type_name: String,
    kind: Kind,
    index: u16,
}

#[derive(Debug, Default)]
struct Scope {
    entries: HashMap<String, Entry>,
    counts: HashMap<Kind, u16>,
}

impl Scope {
    fn define(&mut self, name: &str, type_name: &str, kind: Kind) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        let index = *self.counts.get(&kind).unwrap_or(&0);
        self.entries.insert(
            name.to_string(),
            Entry {
                type_name: type_name.to_string(),
                kind,
                index,
            },
        );
        self.counts.insert(kind, index + 1);
        true
    }

    fn count(&self, kind: Kind) -> u16 {
        *self.counts.get(&kind).unwrap_or(&0)
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: Scope,
    subroutine_scope: Scope,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the subroutine scope; the class scope is untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope = Scope::default();
    }

    /// Defines `name` in the scope implied by `kind` (class scope for
    /// `Static`/`Field`, subroutine scope for `Arg`/`Local`). Returns `false`
    /// if `name` is already defined in that scope.
    #[must_use]
    pub fn define(&mut self, name: &str, type_name: &str, kind: Kind) -> bool {
        self.scope_for_mut(kind).define(name, type_name, kind)
    }

    #[must_use]
    pub fn count(&self, kind: Kind) -> u16 {
        self.scope_for(kind).count(kind)
    }

    fn scope_for(&self, kind: Kind) -> &Scope {
        match kind {
            Kind::Static | Kind::Field => &self.class_scope,
            Kind::Arg | Kind::Local => &self.subroutine_scope,
        }
    }

    fn scope_for_mut(&mut self, kind: Kind) -> &mut Scope {
        match kind {
            Kind::Static | Kind::Field => &mut self.class_scope,
            Kind::Arg | Kind::Local => &mut self.subroutine_scope,
        }
    }

    fn lookup(&self, name: &str) -> Option<&Entry> {
        self.subroutine_scope
            .entries
            .get(name)
            .or_else(|| self.class_scope.entries.get(name))
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|e| e.kind)
    }

    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|e| e.type_name.as_str())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|e| e.index)
    }
}
