//! Configuration for the filter compiler.

use query_engine_sql::sql::format::FormatOptions;

/// The default bound on how deeply filters may nest.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// The 'Configuration' type collects everything the compiler needs at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which is where the serialized format is
/// validated and interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// How identifiers and values are quoted.
    pub format: FormatOptions,
    /// The deepest nesting of `$not` and connectives a filter may use.
    pub max_depth: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            format: FormatOptions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
