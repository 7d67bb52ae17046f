//! Environment variable sources.
//!
//! The resolver only ever asks for one key at a time, so a source is just a
//! read-only lookup. [`StdEnv`] reads the process environment, [`MockEnv`]
//! is an in-memory map for tests.

use indexmap::IndexMap;

/// Where lookup keys are resolved to values.
pub trait EnvSource {
    /// Get the value of an environment variable by exact, case-sensitive name.
    fn get(&self, name: &str) -> Option<String>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        // `var` rejects empty names and names containing `=` or NUL with an
        // error rather than a panic.
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, for tests and for fetching from something
/// other than the process environment.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: IndexMap<String, String, std::hash::RandomState>,
}

impl MockEnv {
    /// An environment with no variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `(name, value)` pairs. A repeated name keeps its last value.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
