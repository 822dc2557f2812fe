///
/// IR Vocabulary
///
/// The slice of the compiler's typed IR that the binding layer sees: the
/// builtin operator ids, generation genre, coroutine strategy, and the
/// minimal type and method shapes used by member synthesis.
///

pub mod operators;
pub mod types;

use std::fmt;

use serde::Deserialize;

pub use operators::{BuiltinOperatorId, ReturnKind};
pub use types::{
    IrType, MetadataKey, MethodKind, MethodShape, TypeShape, Visibility, typeof_category,
};

/// Generation mode for one translation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    /// Real compiled output; shapes are validated strictly.
    #[default]
    Library,
    /// Examples and snippets; shape errors fall back to placeholder names.
    Documentation,
}

impl Genre {
    pub fn is_strict(self) -> bool {
        matches!(self, Genre::Library)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Genre::Library => f.write_str("library"),
            Genre::Documentation => f.write_str("documentation"),
        }
    }
}

/// How suspending functions were lowered before code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoroutineStrategy {
    /// Coroutines became native generator functions already.
    #[default]
    TranslateToGenerator,
    /// Generator functions are wrapped at runtime by the support library.
    AdaptGenerators,
}

impl fmt::Display for CoroutineStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoroutineStrategy::TranslateToGenerator => f.write_str("translate-to-generator"),
            CoroutineStrategy::AdaptGenerators => f.write_str("adapt-generators"),
        }
    }
}
