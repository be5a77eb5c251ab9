//! Runtime model of Java generic types: substitution along a type hierarchy and assignability
//! under generics variance rules.
//!
//! Descriptors ([`Type`]) refer to declarations held behind a [`TypeEnv`]; [`TypeStore`] is the
//! in-memory implementation. All queries go through a [`Resolver`], which can share a
//! [`DescriptorCache`] of supertype edges between calls. The free functions below are shortcuts
//! that use default limits and no cache.
//!
//! ```
//! use bus_types::{is_assignable, Type, TypeEnv, TypeStore};
//!
//! let store = TypeStore::with_minimal_jdk();
//! let list = store.class_id("java.util.List").unwrap();
//! let wk = store.well_known();
//!
//! let strings = Type::parameterized(list, vec![Type::class(wk.string)]);
//! let sequences = Type::parameterized(list, vec![Type::extends(Type::class(wk.char_sequence))]);
//! assert!(is_assignable(&store, Some(&strings), &sequences).unwrap());
//! ```

mod assign;
mod bounds;
mod cache;
mod error;
mod format;
mod jdk;
mod model;
mod options;
mod resolver;
mod store;
mod walk;

pub use cache::{CacheStats, ClassEdges, DescriptorCache};
pub use error::{Result, TypeError};
pub use format::{class_name, format_type, format_type_var_long, TypeDisplay};
pub use model::{
    ArrayType, ClassDef, ClassId, ClassKind, FieldDef, GenericDeclaration, ParameterizedType,
    PrimitiveType, Type, TypeArgMap, TypeParamDef, TypeVarId, WildcardType,
};
pub use options::ResolverOptions;
pub use resolver::Resolver;
pub use store::{TypeEnv, TypeStore, WellKnownTypes};
pub use walk::{array_component_type, is_array_type, type_arguments_of};

/// See [`Resolver::resolve_arguments`].
pub fn resolve_arguments(
    env: &dyn TypeEnv,
    subject: &Type,
    target: ClassId,
    inherited: &TypeArgMap,
) -> Result<Option<TypeArgMap>> {
    Resolver::new(env).resolve_arguments(subject, target, inherited)
}

/// See [`Resolver::actual_type_for`].
pub fn actual_type_for(
    env: &dyn TypeEnv,
    context: &Type,
    declaring: ClassId,
    expression: &Type,
) -> Result<Type> {
    Resolver::new(env).actual_type_for(context, declaring, expression)
}

/// See [`Resolver::is_assignable`]. No type-variable context is applied.
pub fn is_assignable(env: &dyn TypeEnv, from: Option<&Type>, to: &Type) -> Result<bool> {
    Resolver::new(env).is_assignable(from, to, None)
}

/// See [`Resolver::normalize_upper_bounds`].
pub fn normalize_upper_bounds(env: &dyn TypeEnv, bounds: &[Type]) -> Result<Vec<Type>> {
    Resolver::new(env).normalize_upper_bounds(bounds)
}
