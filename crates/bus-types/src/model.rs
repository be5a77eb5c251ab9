use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Identity of a nominal type (class, interface or primitive) inside a [`crate::TypeStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a type variable.
///
/// The store interns variables per `(name, declaring element)`, so two variables with the same
/// name declared on different classes or methods never share an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(pub(crate) u32);

impl TypeVarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    /// Widening primitive conversion (JLS 5.1.2). Identity is not a widening.
    pub fn widens_to(self, to: PrimitiveType) -> bool {
        use PrimitiveType::*;
        match self {
            Byte => matches!(to, Short | Int | Long | Float | Double),
            Short | Char => matches!(to, Int | Long | Float | Double),
            Int => matches!(to, Long | Float | Double),
            Long => matches!(to, Float | Double),
            Float => matches!(to, Double),
            Boolean | Double => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Primitive(PrimitiveType),
}

/// The element that introduces a type variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GenericDeclaration {
    Class(ClassId),
    Method { owner: ClassId, name: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    pub declaring: GenericDeclaration,
    /// Declared upper bounds, in source order. Empty means "unbounded".
    pub upper_bounds: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
}

/// Introspectable declaration of a nominal type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    /// Lexically enclosing class for nested declarations.
    pub enclosing: Option<ClassId>,
    pub fields: Vec<FieldDef>,
}

impl ClassDef {
    /// Unqualified name: the part after the last `$` or `.`.
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(|c| c == '$' || c == '.')
            .next()
            .unwrap_or(&self.name)
    }
}

/// A type occurring in a generic declaration.
///
/// Equality is structural. See [`ParameterizedType`] for the one exception (owner types).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// A class, interface or primitive, independent of any instantiation.
    Class(ClassId),
    /// A nominal type applied to type arguments, e.g. `List<String>`.
    Parameterized(ParameterizedType),
    TypeVar(TypeVarId),
    Wildcard(WildcardType),
    Array(ArrayType),
}

impl Type {
    pub fn class(id: ClassId) -> Type {
        Type::Class(id)
    }

    pub fn parameterized(raw: ClassId, args: Vec<Type>) -> Type {
        Type::Parameterized(ParameterizedType {
            raw,
            args,
            owner: None,
        })
    }

    pub fn parameterized_with_owner(owner: Type, raw: ClassId, args: Vec<Type>) -> Type {
        Type::Parameterized(ParameterizedType {
            raw,
            args,
            owner: Some(Box::new(owner)),
        })
    }

    /// Build an array type. The generic flag is derived from the component.
    pub fn array(component: Type) -> Type {
        Type::Array(ArrayType::new(component))
    }

    /// `?`
    pub fn wildcard() -> Type {
        Type::Wildcard(WildcardType::unbounded())
    }

    /// `? extends bound`
    pub fn extends(bound: Type) -> Type {
        Type::Wildcard(WildcardType::extends(bound))
    }

    /// `? super bound`
    pub fn super_(bound: Type) -> Type {
        Type::Wildcard(WildcardType::super_(bound))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Type::Wildcard(_))
    }

    pub fn as_type_var(&self) -> Option<TypeVarId> {
        match self {
            Type::TypeVar(id) => Some(*id),
            _ => None,
        }
    }

    /// The nominal class for `Class` and `Parameterized` types.
    pub fn nominal_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(id) => Some(*id),
            Type::Parameterized(p) => Some(p.raw),
            _ => None,
        }
    }
}

/// A nominal type applied to actual type arguments.
///
/// Arguments correspond positionally to the raw type's declared parameters. The owner (for
/// nested generic declarations) participates in resolution but not in equality: two
/// parameterized types are equal iff their raw types and argument lists are equal.
#[derive(Clone, Debug)]
pub struct ParameterizedType {
    pub raw: ClassId,
    pub args: Vec<Type>,
    pub owner: Option<Box<Type>>,
}

impl PartialEq for ParameterizedType {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.args == other.args
    }
}

impl Eq for ParameterizedType {}

impl Hash for ParameterizedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.args.hash(state);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WildcardType {
    /// Empty means the implicit `Object` bound.
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
}

impl WildcardType {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn extends(bound: Type) -> Self {
        Self {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
        }
    }

    pub fn super_(bound: Type) -> Self {
        Self {
            upper_bounds: Vec::new(),
            lower_bounds: vec![bound],
        }
    }
}

/// An array type. `generic` is set iff the component is a type variable, a parameterized type
/// or itself a generic array (`T[]`, `List<String>[]`, `T[][]`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrayType {
    component: Box<Type>,
    generic: bool,
}

impl ArrayType {
    pub fn new(component: Type) -> Self {
        let generic = match &component {
            Type::TypeVar(_) | Type::Parameterized(_) => true,
            Type::Array(inner) => inner.generic,
            Type::Class(_) | Type::Wildcard(_) => false,
        };
        Self {
            component: Box::new(component),
            generic,
        }
    }

    pub fn component(&self) -> &Type {
        &self.component
    }

    pub fn is_generic(&self) -> bool {
        self.generic
    }
}

/// Resolved bindings from type variables to descriptors, valid relative to one context.
///
/// Maps are values: every walking step extends a copy of the previous map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeArgMap {
    bindings: HashMap<TypeVarId, Type>,
}

impl TypeArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of `self` extended with `var -> ty`.
    pub fn with_binding(mut self, var: TypeVarId, ty: Type) -> Self {
        self.bindings.insert(var, ty);
        self
    }

    pub(crate) fn bind(&mut self, var: TypeVarId, ty: Type) {
        self.bindings.insert(var, ty);
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.bindings.get(&var)
    }

    pub fn contains(&self, var: TypeVarId) -> bool {
        self.bindings.contains_key(&var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &Type)> {
        self.bindings.iter().map(|(var, ty)| (*var, ty))
    }

    /// Keep only the bindings for `vars`.
    pub fn restricted_to(&self, vars: &[TypeVarId]) -> TypeArgMap {
        let bindings = self
            .bindings
            .iter()
            .filter(|(var, _)| vars.contains(var))
            .map(|(var, ty)| (*var, ty.clone()))
            .collect();
        TypeArgMap { bindings }
    }
}

impl FromIterator<(TypeVarId, Type)> for TypeArgMap {
    fn from_iter<I: IntoIterator<Item = (TypeVarId, Type)>>(iter: I) -> Self {
        TypeArgMap {
            bindings: iter.into_iter().collect(),
        }
    }
}
