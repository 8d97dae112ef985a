//! Dependency scopes and the runtime-inclusive scope filter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The scope a dependency was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Needed to compile and at runtime.
    Compile,
    /// Needed only at runtime.
    Runtime,
    /// Needed only by tests.
    Test,
    /// Supplied by the host at runtime.
    Provided,
}

impl Scope {
    /// Return true when the runtime scope filter includes this scope.
    ///
    /// Compile and runtime scopes are visible at runtime; test and provided
    /// scopes are not shipped with the plugin.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluginpack::artifact::Scope;
    ///
    /// assert!(Scope::Compile.is_runtime_visible());
    /// assert!(!Scope::Provided.is_runtime_visible());
    /// ```
    #[must_use]
    pub const fn is_runtime_visible(self) -> bool {
        matches!(self, Self::Compile | Self::Runtime)
    }

    /// Return the lowercase scope name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::Provided => "provided",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
