use std::collections::HashSet;

use crate::error::{Result, TypeError};
use crate::format::type_var_name;
use crate::resolver::Resolver;
use crate::{
    ClassId, GenericDeclaration, ParameterizedType, Type, TypeArgMap, TypeVarId, WildcardType,
};

/// Outcome of following variable-to-variable bindings.
enum Chase {
    /// The start variable has no binding.
    Unbound,
    Resolved(Type),
    /// The chain ended at a variable with no binding.
    Dangling(TypeVarId),
}

impl<'env> Resolver<'env> {
    /// Walk from `subject` up to `target`, recording what each type variable on the way is bound
    /// to. The result extends a copy of `inherited`.
    ///
    /// Returns `Ok(None)` when `subject` is not assignable to `target`.
    pub fn resolve_arguments(
        &self,
        subject: &Type,
        target: ClassId,
        inherited: &TypeArgMap,
    ) -> Result<Option<TypeArgMap>> {
        self.resolve_at(subject, target, inherited.clone(), 0)
    }

    pub(crate) fn resolve_at(
        &self,
        subject: &Type,
        target: ClassId,
        map: TypeArgMap,
        depth: usize,
    ) -> Result<Option<TypeArgMap>> {
        self.check_depth(depth)?;
        tracing::trace!(
            target: "bus_types",
            subject = %self.type_name(subject),
            target = %self.class_name(target),
            depth,
            "resolve step"
        );

        match subject {
            Type::Class(id) => self.resolve_class(*id, target, map, depth),
            Type::Parameterized(p) => self.resolve_parameterized(p, target, map, depth),
            Type::TypeVar(var) => {
                let bounds = self.implicit_bounds(*var)?;
                self.resolve_through_bounds(&bounds, target, map, depth)
            }
            Type::Wildcard(wildcard) => {
                let bounds = self.implicit_upper_bounds(wildcard);
                self.resolve_through_bounds(&bounds, target, map, depth)
            }
            Type::Array(array) => {
                if let Type::Wildcard(_) = array.component() {
                    return Err(TypeError::MisplacedWildcard {
                        wildcard: self.type_name(array.component()),
                        position: "an array component",
                    });
                }
                if self.is_assignable_at(Some(subject), &Type::Class(target), None, depth + 1)? {
                    Ok(Some(map))
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn resolve_class(
        &self,
        class: ClassId,
        target: ClassId,
        map: TypeArgMap,
        depth: usize,
    ) -> Result<Option<TypeArgMap>> {
        if !self.class_assignable(class, target)? {
            return Ok(None);
        }

        let wk = self.env().well_known();
        let class = match wk.primitive_type(class) {
            Some(_) if self.is_primitive(target) => return Ok(Some(TypeArgMap::new())),
            Some(p) => wk.wrapper(p),
            None => class,
        };
        if class == target {
            return Ok(Some(map));
        }

        match self.closest_parent(class, target)? {
            Some(parent) => self.resolve_at(&parent, target, map, depth + 1),
            None => Ok(Some(map)),
        }
    }

    fn resolve_parameterized(
        &self,
        subject: &ParameterizedType,
        target: ClassId,
        map: TypeArgMap,
        depth: usize,
    ) -> Result<Option<TypeArgMap>> {
        let raw = subject.raw;
        if !self.class_assignable(raw, target)? {
            return Ok(None);
        }

        let mut map = match subject.owner.as_deref() {
            Some(owner @ Type::Parameterized(owner_p)) => self
                .resolve_at(owner, owner_p.raw, map.clone(), depth + 1)?
                .unwrap_or(map),
            _ => map,
        };

        let edges = self.edges(raw)?;
        if edges.type_params.len() != subject.args.len() {
            return Err(TypeError::ArgumentCountMismatch {
                class: self.class_name(raw),
                expected: edges.type_params.len(),
                found: subject.args.len(),
            });
        }

        let snapshot = map.clone();
        for (param, arg) in edges.type_params.iter().zip(&subject.args) {
            if arg.as_type_var() == Some(*param) {
                continue;
            }
            let value = self.substitute_at(arg, &snapshot, depth + 1)?;
            map.bind(*param, value);
        }

        if raw == target {
            return Ok(Some(map));
        }
        match self.closest_parent(raw, target)? {
            Some(parent) => self.resolve_at(&parent, target, map, depth + 1),
            None => Ok(Some(map)),
        }
    }

    fn resolve_through_bounds(
        &self,
        bounds: &[Type],
        target: ClassId,
        map: TypeArgMap,
        depth: usize,
    ) -> Result<Option<TypeArgMap>> {
        let target_ty = Type::Class(target);
        for bound in bounds {
            if self.is_assignable_at(Some(bound), &target_ty, None, depth + 1)? {
                return self.resolve_at(bound, target, map, depth + 1);
            }
        }
        Ok(None)
    }

    /// Follow `var` through variable-to-variable bindings in `map`.
    ///
    /// Returns `Ok(None)` when `var` is unbound or the chain ends at an unbound variable. Revisiting
    /// a variable (including a direct `T -> T` binding) is a [`TypeError::VariableCycle`].
    pub fn unroll_variable_chain(&self, var: TypeVarId, map: &TypeArgMap) -> Result<Option<Type>> {
        Ok(match self.chase(var, map)? {
            Chase::Resolved(ty) => Some(ty),
            Chase::Unbound | Chase::Dangling(_) => None,
        })
    }

    /// Like [`Self::unroll_variable_chain`] for a map produced by walking `subject`, except that
    /// a chain ending at a variable `subject` passes as its own argument (`Box<T>` inside `Box`)
    /// yields that variable.
    pub(crate) fn walked_argument(
        &self,
        param: TypeVarId,
        map: &TypeArgMap,
        subject: &Type,
    ) -> Result<Option<Type>> {
        let last = match self.chase(param, map)? {
            Chase::Resolved(ty) => return Ok(Some(ty)),
            Chase::Unbound => param,
            Chase::Dangling(last) => last,
        };
        Ok(self
            .passes_own_variable(subject, last)?
            .then_some(Type::TypeVar(last)))
    }

    /// Whether `ty` or one of its owners supplies `var` as the argument for `var` itself.
    fn passes_own_variable(&self, ty: &Type, var: TypeVarId) -> Result<bool> {
        let mut current = ty;
        while let Type::Parameterized(p) = current {
            let edges = self.edges(p.raw)?;
            if edges
                .type_params
                .iter()
                .zip(&p.args)
                .any(|(param, arg)| *param == var && arg.as_type_var() == Some(var))
            {
                return Ok(true);
            }
            match p.owner.as_deref() {
                Some(owner) => current = owner,
                None => break,
            }
        }
        Ok(false)
    }

    fn chase(&self, var: TypeVarId, map: &TypeArgMap) -> Result<Chase> {
        let mut visited = HashSet::from([var]);
        let mut current = var;
        let mut steps = 0usize;
        loop {
            let Some(bound) = map.get(current) else {
                return Ok(if current == var {
                    Chase::Unbound
                } else {
                    Chase::Dangling(current)
                });
            };
            let Type::TypeVar(next) = bound else {
                return Ok(Chase::Resolved(bound.clone()));
            };

            steps += 1;
            if steps > self.options().max_variable_chain {
                return Err(TypeError::VariableChainTooLong {
                    variable: type_var_name(self.env(), var),
                    limit: self.options().max_variable_chain,
                });
            }
            if !visited.insert(*next) {
                let variable = type_var_name(self.env(), var);
                tracing::debug!(target: "bus_types", %variable, "type variable cycle");
                return Err(TypeError::VariableCycle { variable });
            }
            current = *next;
        }
    }

    /// Replace every type variable in `ty` by its binding in `map`.
    ///
    /// Unbound variables stay as they are; a chain that ends at an unbound variable yields that
    /// last variable. Bound values are inserted as-is, without substituting into them again.
    pub fn substitute(&self, ty: &Type, map: &TypeArgMap) -> Result<Type> {
        self.substitute_at(ty, map, 0)
    }

    pub(crate) fn substitute_at(&self, ty: &Type, map: &TypeArgMap, depth: usize) -> Result<Type> {
        self.check_depth(depth)?;
        Ok(match ty {
            Type::Class(_) => ty.clone(),
            Type::TypeVar(var) => match self.chase(*var, map)? {
                Chase::Resolved(resolved) => resolved,
                Chase::Dangling(last) => Type::TypeVar(last),
                Chase::Unbound => ty.clone(),
            },
            Type::Parameterized(p) => {
                let args = p
                    .args
                    .iter()
                    .map(|arg| self.substitute_at(arg, map, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                let owner = p
                    .owner
                    .as_deref()
                    .map(|owner| self.substitute_at(owner, map, depth + 1))
                    .transpose()?;
                Type::Parameterized(ParameterizedType {
                    raw: p.raw,
                    args,
                    owner: owner.map(Box::new),
                })
            }
            Type::Wildcard(w) => Type::Wildcard(WildcardType {
                upper_bounds: self.substitute_all(&w.upper_bounds, map, depth + 1)?,
                lower_bounds: self.substitute_all(&w.lower_bounds, map, depth + 1)?,
            }),
            Type::Array(array) => Type::array(self.substitute_at(array.component(), map, depth + 1)?),
        })
    }

    fn substitute_all(&self, types: &[Type], map: &TypeArgMap, depth: usize) -> Result<Vec<Type>> {
        types
            .iter()
            .map(|ty| self.substitute_at(ty, map, depth))
            .collect()
    }

    /// One-level substitution of a type variable through `ctx`, used on wildcard and variable
    /// bounds before they are compared.
    pub(crate) fn substitute_top(&self, ty: &Type, ctx: Option<&TypeArgMap>) -> Result<Type> {
        match (ty, ctx) {
            (Type::TypeVar(var), Some(ctx)) => Ok(match self.chase(*var, ctx)? {
                Chase::Resolved(resolved) => resolved,
                Chase::Dangling(last) => Type::TypeVar(last),
                Chase::Unbound => ty.clone(),
            }),
            _ => Ok(ty.clone()),
        }
    }

    /// Resolve `context` against `declaring` and substitute the resulting bindings into
    /// `expression`.
    ///
    /// `expression` is typically a field or method type written in terms of `declaring`'s type
    /// parameters. If `context` is not a subtype of `declaring`, `expression` comes back as-is.
    pub fn actual_type_for(
        &self,
        context: &Type,
        declaring: ClassId,
        expression: &Type,
    ) -> Result<Type> {
        match self.resolve_arguments(context, declaring, &TypeArgMap::new())? {
            Some(map) => self.substitute(expression, &map),
            None => {
                tracing::debug!(
                    target: "bus_types",
                    context = %self.type_name(context),
                    declaring = %self.class_name(declaring),
                    "context is unrelated to the declaring type"
                );
                Ok(expression.clone())
            }
        }
    }

    /// Type of field `name` declared on `owner`, as seen from `context`.
    pub fn resolve_field_type(
        &self,
        context: &Type,
        owner: ClassId,
        name: &str,
    ) -> Result<Option<Type>> {
        let def = self.class_def(owner)?;
        let Some(field) = def.fields.iter().find(|field| field.name == name) else {
            return Ok(None);
        };
        self.actual_type_for(context, owner, &field.ty).map(Some)
    }

    /// Bindings of `class`'s own type parameters under which `class` is a subtype of the
    /// parameterized `super_type`.
    ///
    /// This is the reverse of [`Resolver::resolve_arguments`]: for `class StringList<T> extends
    /// ArrayList<T>` and `super_type = List<String>` the result binds `StringList.T` to `String`.
    pub fn determine_type_arguments(
        &self,
        class: ClassId,
        super_type: &Type,
    ) -> Result<Option<TypeArgMap>> {
        let Type::Parameterized(super_p) = super_type else {
            return Ok(None);
        };
        self.determine_at(class, super_p, super_type, 0)
    }

    fn determine_at(
        &self,
        class: ClassId,
        super_p: &ParameterizedType,
        super_type: &Type,
        depth: usize,
    ) -> Result<Option<TypeArgMap>> {
        self.check_depth(depth)?;
        let super_class = super_p.raw;
        if !self.class_assignable(class, super_class)? {
            return Ok(None);
        }
        if class == super_class {
            return self.resolve_at(super_type, super_class, TypeArgMap::new(), depth + 1);
        }

        match self.closest_parent(class, super_class)? {
            None => Ok(None),
            Some(Type::Parameterized(mid)) => {
                let Some(mut map) = self.determine_at(mid.raw, super_p, super_type, depth + 1)?
                else {
                    return Ok(None);
                };
                self.map_variables_to_arguments(class, &mid, &mut map)?;
                Ok(Some(map))
            }
            Some(Type::Class(mid)) => self.determine_at(mid, super_p, super_type, depth + 1),
            Some(other) => Err(TypeError::NonNominalSupertype {
                class: self.class_name(class),
                edge: self.type_name(&other),
            }),
        }
    }

    /// For each argument of `parameterized` that is one of `class`'s own parameters, copy the
    /// binding of the corresponding declared parameter onto it.
    fn map_variables_to_arguments(
        &self,
        class: ClassId,
        parameterized: &ParameterizedType,
        map: &mut TypeArgMap,
    ) -> Result<()> {
        if let Some(Type::Parameterized(owner)) = parameterized.owner.as_deref() {
            self.map_variables_to_arguments(class, owner, map)?;
        }

        let own_params = self.edges(class)?.type_params.clone();
        let declared = self.edges(parameterized.raw)?.type_params.clone();
        for (declared_var, arg) in declared.iter().zip(&parameterized.args) {
            let Some(arg_var) = arg.as_type_var() else {
                continue;
            };
            if !own_params.contains(&arg_var) {
                continue;
            }
            if let Some(bound) = map.get(*declared_var).cloned() {
                map.bind(arg_var, bound);
            }
        }
        Ok(())
    }

    /// Whether every binding in `map` satisfies its variable's bounds, with the bounds themselves
    /// substituted through `map`.
    pub fn types_satisfy_variables(&self, map: &TypeArgMap) -> Result<bool> {
        for (var, ty) in map.iter() {
            for bound in self.implicit_bounds(var)? {
                let bound = self.substitute_top(&bound, Some(map))?;
                if !self.is_assignable(Some(ty), &bound, Some(map))? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Erasure of `ty`.
    ///
    /// Variables declared by a class are resolved through `assigning` (the type the variable is
    /// seen from). Method variables, unresolvable variables and wildcards have no raw type.
    pub fn raw_type(&self, ty: &Type, assigning: Option<&Type>) -> Result<Option<Type>> {
        self.raw_type_at(ty, assigning, 0)
    }

    fn raw_type_at(&self, ty: &Type, assigning: Option<&Type>, depth: usize) -> Result<Option<Type>> {
        self.check_depth(depth)?;
        match ty {
            Type::Class(_) => Ok(Some(ty.clone())),
            Type::Parameterized(p) => Ok(Some(Type::Class(p.raw))),
            Type::Wildcard(_) => Ok(None),
            Type::Array(array) => Ok(self
                .raw_type_at(array.component(), assigning, depth + 1)?
                .map(Type::array)),
            Type::TypeVar(var) => {
                let Some(assigning) = assigning else {
                    return Ok(None);
                };
                let GenericDeclaration::Class(declaring) = self.type_param_def(*var)?.declaring
                else {
                    return Ok(None);
                };
                let Some(map) = self.resolve_at(assigning, declaring, TypeArgMap::new(), depth + 1)?
                else {
                    return Ok(None);
                };
                match map.get(*var) {
                    Some(arg) => self.raw_type_at(arg, Some(assigning), depth + 1),
                    None => Ok(None),
                }
            }
        }
    }

    /// Whether `ty` mentions a type variable. A generic class used without arguments counts,
    /// since it implicitly ranges over its own parameters.
    pub fn contains_type_variables(&self, ty: &Type) -> Result<bool> {
        Ok(match ty {
            Type::TypeVar(_) => true,
            Type::Class(id) => !self.edges(*id)?.type_params.is_empty(),
            Type::Parameterized(p) => {
                for arg in &p.args {
                    if self.contains_type_variables(arg)? {
                        return Ok(true);
                    }
                }
                false
            }
            Type::Wildcard(w) => {
                for bound in w.upper_bounds.iter().chain(&w.lower_bounds) {
                    if self.contains_type_variables(bound)? {
                        return Ok(true);
                    }
                }
                false
            }
            Type::Array(array) => self.contains_type_variables(array.component())?,
        })
    }
}

/// First-level type arguments of a parameterized type; empty for everything else.
pub fn type_arguments_of(ty: &Type) -> &[Type] {
    match ty {
        Type::Parameterized(p) => &p.args,
        _ => &[],
    }
}

pub fn is_array_type(ty: &Type) -> bool {
    matches!(ty, Type::Array(_))
}

pub fn array_component_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Array(array) => Some(array.component()),
        _ => None,
    }
}
