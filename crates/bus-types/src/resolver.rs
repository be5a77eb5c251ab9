use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::cache::{ClassEdges, DescriptorCache};
use crate::error::{Result, TypeError};
use crate::format::{class_name, format_type};
use crate::{ClassDef, ClassId, ClassKind, ResolverOptions, Type, TypeEnv, TypeParamDef, TypeVarId};

/// Entry point for hierarchy walking, substitution and assignability queries.
///
/// A resolver is a cheap borrow of a [`TypeEnv`] plus limits. Attach a [`DescriptorCache`] with
/// [`Resolver::with_cache`] to memoize supertype edges across queries.
#[derive(Clone, Copy)]
pub struct Resolver<'env> {
    env: &'env dyn TypeEnv,
    cache: Option<&'env DescriptorCache>,
    options: ResolverOptions,
}

impl fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("cached", &self.cache.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'env> Resolver<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self {
            env,
            cache: None,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_cache(mut self, cache: &'env DescriptorCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.env
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub(crate) fn class_def(&self, id: ClassId) -> Result<&'env ClassDef> {
        self.env.class(id).ok_or(TypeError::UnknownClass(id))
    }

    pub(crate) fn type_param_def(&self, id: TypeVarId) -> Result<&'env TypeParamDef> {
        self.env.type_param(id).ok_or(TypeError::UnknownTypeVar(id))
    }

    pub(crate) fn edges(&self, id: ClassId) -> Result<Arc<ClassEdges>> {
        let compute = || self.class_def(id).map(ClassEdges::from_def);
        match self.cache {
            Some(cache) if self.options.use_cache => cache.get_or_insert_with(id, compute),
            _ => compute().map(Arc::new),
        }
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(TypeError::RecursionLimit {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn class_name(&self, id: ClassId) -> String {
        class_name(self.env, id)
    }

    pub(crate) fn type_name(&self, ty: &Type) -> String {
        format_type(self.env, ty)
    }

    pub(crate) fn is_primitive(&self, id: ClassId) -> bool {
        self.env.well_known().primitive_type(id).is_some()
    }

    pub(crate) fn is_interface(&self, id: ClassId) -> Result<bool> {
        Ok(matches!(self.edges(id)?.kind, ClassKind::Interface))
    }

    /// Class-to-class assignability with autoboxing, unboxing and primitive widening.
    pub(crate) fn class_assignable(&self, from: ClassId, to: ClassId) -> Result<bool> {
        if from == to {
            return Ok(true);
        }
        let wk = self.env.well_known();
        match (wk.primitive_type(from), wk.primitive_type(to)) {
            (Some(from), Some(to)) => Ok(from.widens_to(to)),
            (Some(from), None) => self.is_subclass(wk.wrapper(from), to),
            (None, Some(to)) => Ok(wk
                .unboxed(from)
                .is_some_and(|from| from == to || from.widens_to(to))),
            (None, None) => self.is_subclass(from, to),
        }
    }

    /// Whether `to` is reachable from `from` through superclass and interface edges.
    ///
    /// `Object` is a supertype of every reference type, interfaces included.
    pub(crate) fn is_subclass(&self, from: ClassId, to: ClassId) -> Result<bool> {
        if from == to {
            return Ok(true);
        }
        if to == self.env.well_known().object {
            return Ok(!self.is_primitive(from));
        }

        let mut queue = VecDeque::from([from]);
        let mut seen = HashSet::from([from]);
        while let Some(current) = queue.pop_front() {
            let edges = self.edges(current)?;
            for edge in edges.super_class.iter().chain(edges.interfaces.iter()) {
                let next = self.edge_class(current, edge)?;
                if next == to {
                    return Ok(true);
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        Ok(false)
    }

    /// The nominal class behind a supertype edge of `class`.
    pub(crate) fn edge_class(&self, class: ClassId, edge: &Type) -> Result<ClassId> {
        edge.nominal_class()
            .ok_or_else(|| TypeError::NonNominalSupertype {
                class: self.class_name(class),
                edge: self.type_name(edge),
            })
    }

    /// The supertype edge of `class` to follow when walking toward `target`.
    ///
    /// For interface targets this is the declared interface whose erasure is assignable to
    /// `target`; a later candidate replaces an earlier one when the earlier one is assignable to
    /// the later candidate's erasure. Otherwise (or when no interface qualifies) it is the
    /// declared superclass, which is `None` for interfaces and `Object`.
    pub(crate) fn closest_parent(&self, class: ClassId, target: ClassId) -> Result<Option<Type>> {
        let edges = self.edges(class)?;
        if self.is_interface(target)? {
            let mut chosen: Option<(&Type, ClassId)> = None;
            for edge in &edges.interfaces {
                let edge_class = self.edge_class(class, edge)?;
                if !self.class_assignable(edge_class, target)? {
                    continue;
                }
                let replaces = match chosen {
                    None => true,
                    Some((_, chosen_class)) => self.class_assignable(chosen_class, edge_class)?,
                };
                if replaces {
                    chosen = Some((edge, edge_class));
                }
            }
            if let Some((edge, _)) = chosen {
                return Ok(Some(edge.clone()));
            }
        }

        if let Some(super_class) = &edges.super_class {
            self.edge_class(class, super_class)?;
        }
        Ok(edges.super_class.clone())
    }
}
