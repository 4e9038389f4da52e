use std::fmt;

use tracing::debug;
use uuid::Uuid;

/// Which of a configuration entry's identifier slots a lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One identifier for the title, shared by every occurrence.
    Title,
    /// One identifier per title and year.
    Year(i32),
}

/// Registry lookup key: the bare title, or `title_<year>` for year-scoped identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeKey<'a> {
    pub title: &'a str,
    pub scope: Scope,
}

impl<'a> ScopeKey<'a> {
    pub fn title(title: &'a str) -> Self {
        Self {
            title,
            scope: Scope::Title,
        }
    }

    pub fn year(title: &'a str, year: i32) -> Self {
        Self {
            title,
            scope: Scope::Year(year),
        }
    }
}

impl fmt::Display for ScopeKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Scope::Title => f.write_str(self.title),
            Scope::Year(year) => write!(f, "{}_{}", self.title, year),
        }
    }
}

/// Persisted identifier slots of a configuration entry.
pub trait StoredIdentifiers {
    fn stored_identifier(&self, scope: Scope) -> Option<&str>;
    fn store_identifier(&mut self, scope: Scope, identifier: String);
}

type Generator = Box<dyn FnMut() -> String>;

/// Hands out identifiers for events, reusing whatever the configuration already holds.
pub struct IdentifierRegistry {
    generator: Generator,
    minted: usize,
}

impl Default for IdentifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierRegistry {
    /// Registry minting random (v4) UUIDs.
    pub fn new() -> Self {
        Self::with_generator(|| Uuid::new_v4().to_string())
    }

    pub fn with_generator<F>(generator: F) -> Self
    where
        F: FnMut() -> String + 'static,
    {
        Self {
            generator: Box::new(generator),
            minted: 0,
        }
    }

    /// Returns the identifier stored under `key`, minting and storing a new one if absent.
    pub fn get_or_create<S>(&mut self, spec: &mut S, key: ScopeKey<'_>) -> String
    where
        S: StoredIdentifiers + ?Sized,
    {
        if let Some(existing) = spec.stored_identifier(key.scope) {
            return existing.to_string();
        }

        let identifier = (self.generator)();
        self.minted += 1;
        debug!(scope_key = %key, %identifier, "assigned new identifier");
        spec.store_identifier(key.scope, identifier.clone());
        identifier
    }

    /// Number of identifiers minted since the registry was created.
    pub fn minted(&self) -> usize {
        self.minted
    }
}

impl fmt::Debug for IdentifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierRegistry")
            .field("minted", &self.minted)
            .finish_non_exhaustive()
    }
}
