//! Naming policies for synthesized types.
//!
//! A [`NamingPolicy`] turns the base contract's simple name into the qualified
//! name of one synthesized type. The realizer draws a name on every
//! realization, so a randomized policy yields a fresh name each time while a
//! [`NamingPolicy::Fixed`] name is owned entirely by the caller.
//!
//! ```
//! use portico_core::naming::NamingPolicy;
//!
//! let fixed = NamingPolicy::fixed("X.Y.Z");
//! assert_eq!(fixed.name("EndpointApi"), "X.Y.Z");
//!
//! let plain = NamingPolicy::prefixed("com.acme.", false);
//! assert_eq!(plain.name("EndpointApi"), "com.acme.EndpointApi");
//!
//! let random = NamingPolicy::default();
//! assert_ne!(random.name("EndpointApi"), random.name("EndpointApi"));
//! ```

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Default prefix for generated type names.
pub const DEFAULT_PREFIX: &str = "portico.endpoint.";

/// Default (and minimum) length of the random suffix.
pub const DEFAULT_SUFFIX_LENGTH: usize = 8;

/// A custom naming function.
pub type NamingFn = Arc<dyn Fn(&str) -> String + Send + Sync + 'static>;

/// Strategy for naming synthesized types.
#[derive(Clone)]
pub enum NamingPolicy {
    /// `prefix + simple_name`, optionally followed by `$` and a random suffix.
    Prefixed {
        /// Name prefix, usually a package path ending in `.`.
        prefix: String,
        /// Whether to append a random suffix.
        random_suffix: bool,
        /// Length of the random suffix.
        suffix_length: usize,
    },
    /// Fully custom naming function.
    Custom(NamingFn),
    /// Single fixed name; the caller owns uniqueness.
    Fixed(String),
}

impl NamingPolicy {
    /// Creates a prefixed policy with the default suffix length.
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>, random_suffix: bool) -> Self {
        Self::Prefixed {
            prefix: prefix.into(),
            random_suffix,
            suffix_length: DEFAULT_SUFFIX_LENGTH,
        }
    }

    /// Creates a policy backed by a naming function.
    #[must_use]
    pub fn custom<F>(naming: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(naming))
    }

    /// Creates a fixed-name policy.
    #[must_use]
    pub fn fixed(name: impl Into<String>) -> Self {
        Self::Fixed(name.into())
    }

    /// Draws the qualified name for a type with the given simple name.
    #[must_use]
    pub fn name(&self, simple_name: &str) -> String {
        match self {
            Self::Prefixed {
                prefix,
                random_suffix: true,
                suffix_length,
            } => format!(
                "{prefix}{simple_name}${}",
                random_string((*suffix_length).max(DEFAULT_SUFFIX_LENGTH))
            ),
            Self::Prefixed { prefix, .. } => format!("{prefix}{simple_name}"),
            Self::Custom(naming) => naming(simple_name),
            Self::Fixed(name) => name.clone(),
        }
    }

    /// Returns `true` if every draw yields the same name.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        matches!(
            self,
            Self::Fixed(_)
                | Self::Prefixed {
                    random_suffix: false,
                    ..
                }
        )
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::prefixed(DEFAULT_PREFIX, true)
    }
}

impl fmt::Debug for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefixed {
                prefix,
                random_suffix,
                suffix_length,
            } => f
                .debug_struct("Prefixed")
                .field("prefix", prefix)
                .field("random_suffix", random_suffix)
                .field("suffix_length", suffix_length)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Fixed(name) => f.debug_tuple("Fixed").field(name).finish(),
        }
    }
}

/// Returns `len` random alphanumeric characters.
///
/// Draws from the thread-local, OS-seeded generator, so concurrent callers
/// never share a sequence.
#[must_use]
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
