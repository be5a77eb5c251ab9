use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Limits and switches applied by [`crate::Resolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct ResolverOptions {
    /// Maximum number of variable-to-variable hops followed when unrolling a binding.
    #[schemars(range(min = 1))]
    pub max_variable_chain: usize,
    /// Maximum nesting of hierarchy walks and structural recursion.
    #[schemars(range(min = 1))]
    pub max_depth: usize,
    /// Whether a resolver built with a [`crate::DescriptorCache`] consults it.
    pub use_cache: bool,
}

impl ResolverOptions {
    pub const DEFAULT_MAX_VARIABLE_CHAIN: usize = 64;
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_variable_chain: Self::DEFAULT_MAX_VARIABLE_CHAIN,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            use_cache: true,
        }
    }
}
