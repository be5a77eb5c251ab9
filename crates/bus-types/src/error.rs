use crate::{ClassId, TypeVarId};

pub type Result<T> = std::result::Result<T, TypeError>;

/// Malformed-declaration errors raised while walking or comparing descriptors.
///
/// "No relationship" outcomes are never errors; they surface as `Ok(None)` / `Ok(false)`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("unknown class id {0:?}")]
    UnknownClass(ClassId),

    #[error("unknown type variable id {0:?}")]
    UnknownTypeVar(TypeVarId),

    #[error("wrong number of type arguments for {class}: expected {expected}, found {found}")]
    ArgumentCountMismatch {
        class: String,
        expected: usize,
        found: usize,
    },

    #[error("wildcard {wildcard} is not allowed as {position}")]
    MisplacedWildcard {
        wildcard: String,
        position: &'static str,
    },

    #[error("supertype {edge} of {class} is not a class or parameterized type")]
    NonNominalSupertype { class: String, edge: String },

    #[error("bound list must not be empty")]
    EmptyBounds,

    #[error("type variable {variable} is bound to itself through a chain of variables")]
    VariableCycle { variable: String },

    #[error("type variable chain starting at {variable} exceeds {limit} steps")]
    VariableChainTooLong { variable: String, limit: usize },

    #[error("type hierarchy is deeper than {limit} levels (cyclic supertypes?)")]
    RecursionLimit { limit: usize },

    #[error("{owner} is not a valid owner type for {class}")]
    InvalidOwner { owner: String, class: String },

    #[error("no binding for type variable {variable}")]
    MissingBinding { variable: String },
}
