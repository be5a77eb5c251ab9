use crate::error::{Result, TypeError};
use crate::resolver::Resolver;
use crate::{ArrayType, ClassId, ParameterizedType, Type, TypeArgMap, TypeVarId, WildcardType};

impl<'env> Resolver<'env> {
    /// Whether a value of type `from` can be assigned to `to` under generics variance rules.
    ///
    /// `from = None` stands for the null type, assignable to every non-primitive target. `ctx`
    /// supplies bindings for type variables that occur in `to`.
    pub fn is_assignable(
        &self,
        from: Option<&Type>,
        to: &Type,
        ctx: Option<&TypeArgMap>,
    ) -> Result<bool> {
        self.is_assignable_at(from, to, ctx, 0)
    }

    pub(crate) fn is_assignable_at(
        &self,
        from: Option<&Type>,
        to: &Type,
        ctx: Option<&TypeArgMap>,
        depth: usize,
    ) -> Result<bool> {
        self.check_depth(depth)?;
        if from == Some(to) {
            return Ok(true);
        }

        match to {
            Type::Class(to) => self.assignable_to_class(from, *to, depth),
            Type::Parameterized(to_p) => self.assignable_to_parameterized(from, to, to_p, ctx, depth),
            Type::Array(to) => self.assignable_to_array(from, to, ctx, depth),
            // A wildcard only has meaning as a type argument; see `contained_by`.
            Type::Wildcard(_) => Ok(false),
            Type::TypeVar(to) => self.assignable_to_type_var(from, *to, ctx, depth),
        }
    }

    fn assignable_to_class(&self, from: Option<&Type>, to: ClassId, depth: usize) -> Result<bool> {
        let Some(from) = from else {
            return Ok(!self.is_primitive(to));
        };
        let wk = self.env().well_known();
        match from {
            Type::Class(from) => self.class_assignable(*from, to),
            Type::Parameterized(p) => self.class_assignable(p.raw, to),
            Type::TypeVar(var) => {
                let to = Type::Class(to);
                self.any_bound_assignable(&self.implicit_bounds(*var)?, &to, None, depth)
            }
            Type::Array(array) if array.is_generic() => Ok(to == wk.object),
            Type::Array(_) => Ok(wk.is_array_supertype(to)),
            Type::Wildcard(_) => Ok(false),
        }
    }

    fn assignable_to_parameterized(
        &self,
        from: Option<&Type>,
        to: &Type,
        to_p: &ParameterizedType,
        ctx: Option<&TypeArgMap>,
        depth: usize,
    ) -> Result<bool> {
        let Some(from) = from else {
            return Ok(true);
        };
        if let Type::Array(_) = from {
            return Ok(false);
        }

        let raw = to_p.raw;
        let Some(from_map) = self.resolve_at(from, raw, TypeArgMap::new(), depth + 1)? else {
            return Ok(false);
        };
        let inherited = ctx.cloned().unwrap_or_default();
        let Some(to_map) = self.resolve_at(to, raw, inherited, depth + 1)? else {
            return Ok(false);
        };

        let params = self.edges(raw)?.type_params.clone();
        for param in params {
            // An unbound target argument (raw or still-generic target) accepts anything, as does
            // an unbound source argument (raw source).
            let Some(to_arg) = self.walked_argument(param, &to_map, to)? else {
                continue;
            };
            let Some(from_arg) = self.walked_argument(param, &from_map, from)? else {
                continue;
            };
            if from_arg == to_arg {
                continue;
            }
            if let Type::Wildcard(to_wildcard) = &to_arg {
                if self.contained_by(&from_arg, to_wildcard, ctx, depth + 1)? {
                    continue;
                }
            }
            return Ok(false);
        }
        Ok(true)
    }

    /// Wildcard containment: whether the type argument `from` fits inside `to`.
    fn contained_by(
        &self,
        from: &Type,
        to: &WildcardType,
        ctx: Option<&TypeArgMap>,
        depth: usize,
    ) -> Result<bool> {
        if let Type::Wildcard(w) = from {
            if w == to {
                return Ok(true);
            }
        }

        let to_upper = self.implicit_upper_bounds(to);
        let to_lower = self.implicit_lower_bounds(to);

        if let Type::Wildcard(from) = from {
            let from_upper = self.implicit_upper_bounds(from);
            let from_lower = self.implicit_lower_bounds(from);

            for to_bound in &to_upper {
                let to_bound = self.substitute_top(to_bound, ctx)?;
                for bound in &from_upper {
                    if !self.is_assignable_at(Some(bound), &to_bound, ctx, depth + 1)? {
                        return Ok(false);
                    }
                }
            }
            for to_bound in &to_lower {
                let to_bound = self.substitute_top_opt(to_bound.as_ref(), ctx)?;
                for bound in &from_lower {
                    if !self.assignable_opt(to_bound.as_ref(), bound.as_ref(), ctx, depth + 1)? {
                        return Ok(false);
                    }
                }
            }
            return Ok(true);
        }

        for to_bound in &to_upper {
            let to_bound = self.substitute_top(to_bound, ctx)?;
            if !self.is_assignable_at(Some(from), &to_bound, ctx, depth + 1)? {
                return Ok(false);
            }
        }
        for to_bound in &to_lower {
            let to_bound = self.substitute_top_opt(to_bound.as_ref(), ctx)?;
            if !self.is_assignable_at(to_bound.as_ref(), from, ctx, depth + 1)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn assignable_to_array(
        &self,
        from: Option<&Type>,
        to: &ArrayType,
        ctx: Option<&TypeArgMap>,
        depth: usize,
    ) -> Result<bool> {
        let Some(from) = from else {
            return Ok(true);
        };
        let to_ty = Type::Array(to.clone());
        match from {
            Type::Array(from) => {
                let (from_component, to_component) = (from.component(), to.component());
                for component in [from_component, to_component] {
                    if let Type::Wildcard(_) = component {
                        return Err(TypeError::MisplacedWildcard {
                            wildcard: self.type_name(component),
                            position: "an array component",
                        });
                    }
                }
                if self.is_primitive_type(from_component) || self.is_primitive_type(to_component) {
                    return Ok(from_component == to_component);
                }
                self.is_assignable_at(Some(from_component), to_component, ctx, depth + 1)
            }
            Type::Wildcard(w) => {
                self.any_bound_assignable(&self.implicit_upper_bounds(w), &to_ty, None, depth)
            }
            Type::TypeVar(var) => {
                self.any_bound_assignable(&self.implicit_bounds(*var)?, &to_ty, None, depth)
            }
            Type::Class(_) | Type::Parameterized(_) => Ok(false),
        }
    }

    fn assignable_to_type_var(
        &self,
        from: Option<&Type>,
        to: TypeVarId,
        ctx: Option<&TypeArgMap>,
        depth: usize,
    ) -> Result<bool> {
        let Some(from) = from else {
            return Ok(true);
        };
        let to_ty = Type::TypeVar(to);
        if let Type::TypeVar(var) = from {
            if self.any_bound_assignable(&self.implicit_bounds(*var)?, &to_ty, ctx, depth)? {
                return Ok(true);
            }
        }

        let Some(ctx) = ctx else {
            return Ok(false);
        };
        match self.unroll_variable_chain(to, ctx)? {
            Some(resolved) => self.is_assignable_at(Some(from), &resolved, Some(ctx), depth + 1),
            None => Ok(false),
        }
    }

    fn any_bound_assignable(
        &self,
        bounds: &[Type],
        to: &Type,
        ctx: Option<&TypeArgMap>,
        depth: usize,
    ) -> Result<bool> {
        for bound in bounds {
            if self.is_assignable_at(Some(bound), to, ctx, depth + 1)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Assignability between possibly absent lower bounds. An absent source is compatible with
    /// anything non-primitive; an absent target only accepts an absent source.
    fn assignable_opt(
        &self,
        from: Option<&Type>,
        to: Option<&Type>,
        ctx: Option<&TypeArgMap>,
        depth: usize,
    ) -> Result<bool> {
        match to {
            None => Ok(from.is_none()),
            Some(to) => self.is_assignable_at(from, to, ctx, depth),
        }
    }

    fn substitute_top_opt(
        &self,
        ty: Option<&Type>,
        ctx: Option<&TypeArgMap>,
    ) -> Result<Option<Type>> {
        ty.map(|ty| self.substitute_top(ty, ctx)).transpose()
    }

    fn is_primitive_type(&self, ty: &Type) -> bool {
        matches!(ty, Type::Class(id) if self.is_primitive(*id))
    }
}
