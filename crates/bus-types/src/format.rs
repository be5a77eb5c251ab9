use std::fmt;

use crate::{ClassId, GenericDeclaration, Type, TypeEnv, TypeVarId};

/// Java-source-like rendering of a [`Type`].
///
/// ```text
/// java.util.List<? extends java.lang.CharSequence>
/// java.util.Map<K, V>.Entry<K, V>
/// T[]
/// ```
pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a Type,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, ty: &'a Type) -> Self {
        Self { env, ty }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self.env, self.ty, f)
    }
}

pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    TypeDisplay::new(env, ty).to_string()
}

/// `declaring:T extends Bound`, naming the class or method that declares `var`.
pub fn format_type_var_long(env: &dyn TypeEnv, var: TypeVarId) -> String {
    let Some(def) = env.type_param(var) else {
        return format!("{var:?}");
    };
    let mut out = match &def.declaring {
        GenericDeclaration::Class(class) => class_name(env, *class),
        GenericDeclaration::Method { owner, name } => format!("{}.{name}", class_name(env, *owner)),
    };
    out.push(':');
    out.push_str(&def.name);

    let object = Type::Class(env.well_known().object);
    if !def.upper_bounds.is_empty() && def.upper_bounds != [object] {
        out.push_str(" extends ");
        out.push_str(&join(env, &def.upper_bounds, " & "));
    }
    out
}

/// Source-style name of a class: nested classes are written `Outer.Inner`.
pub fn class_name(env: &dyn TypeEnv, id: ClassId) -> String {
    let Some(def) = env.class(id) else {
        return format!("{id:?}");
    };
    match def.enclosing {
        Some(outer) if outer != id => format!("{}.{}", class_name(env, outer), def.simple_name()),
        _ => def.name.clone(),
    }
}

pub(crate) fn type_var_name(env: &dyn TypeEnv, var: TypeVarId) -> String {
    env.type_param(var)
        .map(|def| def.name.clone())
        .unwrap_or_else(|| format!("{var:?}"))
}

fn write_type(env: &dyn TypeEnv, ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        Type::Class(id) => f.write_str(&class_name(env, *id)),
        Type::TypeVar(var) => f.write_str(&type_var_name(env, *var)),
        Type::Parameterized(p) => {
            match p.owner.as_deref() {
                Some(owner @ Type::Parameterized(_)) => {
                    write_type(env, owner, f)?;
                    let simple = env
                        .class(p.raw)
                        .map(|def| def.simple_name().to_string())
                        .unwrap_or_else(|| format!("{:?}", p.raw));
                    write!(f, ".{simple}")?;
                }
                _ => f.write_str(&class_name(env, p.raw))?,
            }
            if !p.args.is_empty() {
                write!(f, "<{}>", join(env, &p.args, ", "))?;
            }
            Ok(())
        }
        Type::Wildcard(w) => {
            f.write_str("?")?;
            if !w.lower_bounds.is_empty() {
                write!(f, " super {}", join(env, &w.lower_bounds, " & "))
            } else if w.upper_bounds.is_empty()
                || w.upper_bounds == [Type::Class(env.well_known().object)]
            {
                Ok(())
            } else {
                write!(f, " extends {}", join(env, &w.upper_bounds, " & "))
            }
        }
        Type::Array(array) => {
            write_type(env, array.component(), f)?;
            f.write_str("[]")
        }
    }
}

fn join(env: &dyn TypeEnv, types: &[Type], sep: &str) -> String {
    types
        .iter()
        .map(|ty| format_type(env, ty))
        .collect::<Vec<_>>()
        .join(sep)
}
