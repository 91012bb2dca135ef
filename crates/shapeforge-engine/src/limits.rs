/// Resource bounds for strategy synthesis and execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of distinct shapes during synthesis (default: 256).
    pub recursion_limit: u32,
    /// Maximum container nesting while decoding or encoding (default: 512).
    pub decode_depth: u32,
    /// Size budget used by [`crate::Generator::generate_default`] (default: 32).
    pub default_size: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            recursion_limit: 256,
            decode_depth: 512,
            default_size: 32,
        }
    }
}

impl Limits {
    pub fn with_recursion_limit(self, recursion_limit: u32) -> Self {
        Self {
            recursion_limit,
            ..self
        }
    }

    pub fn with_decode_depth(self, decode_depth: u32) -> Self {
        Self {
            decode_depth,
            ..self
        }
    }

    pub fn with_default_size(self, default_size: u32) -> Self {
        Self {
            default_size,
            ..self
        }
    }
}
