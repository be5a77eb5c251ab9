use std::collections::HashMap;

use bus_types::{
    ClassDef, ClassId, ClassKind, FieldDef, GenericDeclaration, Type, TypeEnv, TypeError,
    TypeStore, TypeVarId,
};

use crate::error::{Result, SignatureError};
use crate::signature::{
    ClassSignature, ClassTypeSignature, MethodSignature, TypeArgument, TypeParameter,
    TypeSignature,
};

/// Type variables visible while translating a signature, keyed by source name.
///
/// Later insertions shadow earlier ones, so a method scope is built by cloning the class scope and
/// inserting the method's own variables on top.
#[derive(Debug, Clone, Default)]
pub struct TypeVarScope {
    vars: HashMap<String, TypeVarId>,
}

impl TypeVarScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope of the body of `class`: its own variables plus those of every enclosing class, with
    /// inner declarations shadowing outer ones.
    pub fn for_class(env: &dyn TypeEnv, class: ClassId) -> Self {
        let mut chain = Vec::new();
        let mut current = Some(class);
        while let Some(id) = current {
            let Some(def) = env.class(id) else { break };
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            current = def.enclosing;
        }

        let mut scope = Self::new();
        for id in chain.into_iter().rev() {
            let Some(def) = env.class(id) else { continue };
            for &var in &def.type_params {
                if let Some(param) = env.type_param(var) {
                    scope.insert(&param.name, var);
                }
            }
        }
        scope
    }

    pub fn insert(&mut self, name: &str, id: TypeVarId) {
        self.vars.insert(name.to_string(), id);
    }

    pub fn get(&self, name: &str) -> Option<TypeVarId> {
        self.vars.get(name).copied()
    }
}

/// Translate a signature into a [`Type`], interning placeholder declarations for classes the
/// store has not seen yet.
pub fn ty_from_type_sig(
    store: &mut TypeStore,
    scope: &TypeVarScope,
    sig: &TypeSignature,
) -> Result<Type> {
    match sig {
        TypeSignature::Base(p) => Ok(Type::class(store.well_known().primitive(*p))),
        TypeSignature::TypeVar(name) => scope
            .get(name)
            .map(Type::TypeVar)
            .ok_or_else(|| SignatureError::UnknownTypeVariable(name.clone())),
        TypeSignature::Array(component) => {
            Ok(Type::array(ty_from_type_sig(store, scope, component)?))
        }
        TypeSignature::Class(class) => ty_from_class_sig(store, scope, class),
    }
}

/// Type of a field declared with `signature`, seen from `scope`.
pub fn field_type(
    store: &mut TypeStore,
    scope: &TypeVarScope,
    signature: &TypeSignature,
) -> Result<Type> {
    ty_from_type_sig(store, scope, signature)
}

fn ty_from_class_sig(
    store: &mut TypeStore,
    scope: &TypeVarScope,
    sig: &ClassTypeSignature,
) -> Result<Type> {
    let mut current: Option<Type> = None;
    for (idx, segment) in sig.segments.iter().enumerate() {
        let id = intern(store, &sig.binary_name_of_prefix(idx + 1));
        if let Some(outer) = current.as_ref().and_then(Type::nominal_class) {
            if let Some(def) = store.class_mut(id) {
                def.enclosing.get_or_insert(outer);
            }
        }

        let args = segment
            .type_arguments
            .iter()
            .map(|arg| ty_from_type_arg(store, scope, arg))
            .collect::<Result<Vec<_>>>()?;
        let owner_is_generic = matches!(current, Some(Type::Parameterized(_)));

        current = Some(match current.take() {
            Some(owner) if owner_is_generic || !args.is_empty() => {
                Type::parameterized_with_owner(owner, id, args)
            }
            None if !args.is_empty() => Type::parameterized(id, args),
            _ => Type::class(id),
        });
    }
    current.ok_or(SignatureError::Invalid {
        signature: sig.binary_name(),
        position: 0,
        message: "class type without segments",
    })
}

fn ty_from_type_arg(
    store: &mut TypeStore,
    scope: &TypeVarScope,
    arg: &TypeArgument,
) -> Result<Type> {
    Ok(match arg {
        TypeArgument::Any => Type::wildcard(),
        TypeArgument::Extends(bound) => Type::extends(ty_from_type_sig(store, scope, bound)?),
        TypeArgument::Super(bound) => Type::super_(ty_from_type_sig(store, scope, bound)?),
        TypeArgument::Exact(ty) => ty_from_type_sig(store, scope, ty)?,
    })
}

fn intern(store: &mut TypeStore, name: &str) -> ClassId {
    if let Some(id) = store.class_id(name) {
        return id;
    }
    tracing::debug!(target: "bus_types", class = name, "interning placeholder class");
    store.intern_class_id(name)
}

/// Generic method type, with the method's own type variables declared on
/// [`GenericDeclaration::Method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodType {
    pub type_params: Vec<TypeVarId>,
    pub parameters: Vec<Type>,
    /// `None` for `void`.
    pub return_type: Option<Type>,
    pub throws: Vec<Type>,
}

/// Populates a [`TypeStore`] from parsed signatures.
pub struct DeclarationLoader<'a> {
    store: &'a mut TypeStore,
}

impl<'a> DeclarationLoader<'a> {
    pub fn new(store: &'a mut TypeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TypeStore {
        &*self.store
    }

    /// Define (or redefine) the class `name` from its generic signature.
    ///
    /// Fields already recorded for the class are kept. Interfaces get no superclass even though
    /// their signature names `java.lang.Object`.
    pub fn define_class(
        &mut self,
        name: &str,
        kind: ClassKind,
        signature: &ClassSignature,
    ) -> Result<ClassId> {
        let id = intern(self.store, name);
        let enclosing = match name.rsplit_once('$') {
            Some((outer, _)) => Some(intern(self.store, outer)),
            None => None,
        };

        // Fields may be recorded against a placeholder before its signature is loaded.
        let fields = self
            .store
            .class(id)
            .map(|def| def.fields.clone())
            .unwrap_or_default();

        let outer_scope = match enclosing {
            Some(outer) => TypeVarScope::for_class(&*self.store, outer),
            None => TypeVarScope::new(),
        };
        let (type_params, scope) = self.declare_type_params(
            &signature.type_parameters,
            GenericDeclaration::Class(id),
            outer_scope,
        )?;

        let super_class = match kind {
            ClassKind::Interface => None,
            _ => Some(ty_from_class_sig(
                self.store,
                &scope,
                &signature.super_class,
            )?),
        };
        let interfaces = signature
            .interfaces
            .iter()
            .map(|iface| ty_from_class_sig(self.store, &scope, iface))
            .collect::<Result<Vec<_>>>()?;

        self.store.define_class(
            id,
            ClassDef {
                name: name.to_string(),
                kind,
                type_params,
                super_class,
                interfaces,
                enclosing,
                fields,
            },
        )?;
        tracing::debug!(target: "bus_types", class = name, "defined class from signature");
        Ok(id)
    }

    /// Record a field of `owner` and return its translated type.
    pub fn define_field(
        &mut self,
        owner: ClassId,
        name: &str,
        signature: &TypeSignature,
    ) -> Result<Type> {
        if self.store.class(owner).is_none() {
            return Err(TypeError::UnknownClass(owner).into());
        }
        let scope = TypeVarScope::for_class(&*self.store, owner);
        let ty = field_type(self.store, &scope, signature)?;
        let def = self
            .store
            .class_mut(owner)
            .ok_or(TypeError::UnknownClass(owner))?;
        def.fields.retain(|field| field.name != name);
        def.fields.push(FieldDef {
            name: name.to_string(),
            ty: ty.clone(),
        });
        Ok(ty)
    }

    /// Translate the signature of method `name` declared in `owner`.
    pub fn method_type(
        &mut self,
        owner: ClassId,
        name: &str,
        signature: &MethodSignature,
    ) -> Result<MethodType> {
        if self.store.class(owner).is_none() {
            return Err(TypeError::UnknownClass(owner).into());
        }
        let class_scope = TypeVarScope::for_class(&*self.store, owner);
        let declaring = GenericDeclaration::Method {
            owner,
            name: name.to_string(),
        };
        let (type_params, scope) =
            self.declare_type_params(&signature.type_parameters, declaring, class_scope)?;

        let mut translate = |sig: &TypeSignature| ty_from_type_sig(self.store, &scope, sig);
        let parameters = signature
            .parameters
            .iter()
            .map(&mut translate)
            .collect::<Result<Vec<_>>>()?;
        let return_type = signature.return_type.as_ref().map(&mut translate).transpose()?;
        let throws = signature
            .throws
            .iter()
            .map(&mut translate)
            .collect::<Result<Vec<_>>>()?;

        Ok(MethodType {
            type_params,
            parameters,
            return_type,
            throws,
        })
    }

    /// Allocate every variable before translating any bound, so bounds may mention variables
    /// declared later in the same list.
    fn declare_type_params(
        &mut self,
        params: &[TypeParameter],
        declaring: GenericDeclaration,
        mut scope: TypeVarScope,
    ) -> Result<(Vec<TypeVarId>, TypeVarScope)> {
        let ids: Vec<TypeVarId> = params
            .iter()
            .map(|param| {
                let id = self.store.intern_type_param(&param.name, declaring.clone());
                scope.insert(&param.name, id);
                id
            })
            .collect();

        for (param, &id) in params.iter().zip(&ids) {
            let bounds = param
                .bounds()
                .map(|bound| ty_from_type_sig(self.store, &scope, bound))
                .collect::<Result<Vec<_>>>()?;
            self.store.set_type_param_bounds(id, bounds)?;
        }
        Ok((ids, scope))
    }
}
