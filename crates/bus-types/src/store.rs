use std::collections::HashMap;

use crate::error::{Result, TypeError};
use crate::format::{format_type, type_var_name};
use crate::resolver::Resolver;
use crate::{
    ClassDef, ClassId, ClassKind, GenericDeclaration, PrimitiveType, Type, TypeArgMap,
    TypeParamDef, TypeVarId,
};

/// Read-only view over class and type-variable declarations.
///
/// Every algorithm in this crate goes through this trait, so callers can back it with something
/// other than [`TypeStore`] (for example a lazily populated index).
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

/// Ids of the types the algorithms need to know about by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub comparable: ClassId,
    pub char_sequence: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    /// Indexed by [`PrimitiveType::index`].
    pub primitives: [ClassId; 8],
    /// Indexed by [`PrimitiveType::index`].
    pub wrappers: [ClassId; 8],
}

impl WellKnownTypes {
    pub fn primitive(&self, p: PrimitiveType) -> ClassId {
        self.primitives[p.index()]
    }

    pub fn wrapper(&self, p: PrimitiveType) -> ClassId {
        self.wrappers[p.index()]
    }

    pub fn primitive_type(&self, id: ClassId) -> Option<PrimitiveType> {
        PrimitiveType::ALL
            .into_iter()
            .find(|p| self.primitives[p.index()] == id)
    }

    /// The primitive a wrapper class unboxes to.
    pub fn unboxed(&self, id: ClassId) -> Option<PrimitiveType> {
        PrimitiveType::ALL
            .into_iter()
            .find(|p| self.wrappers[p.index()] == id)
    }

    /// Whether every array type is a subtype of `id`.
    pub fn is_array_supertype(&self, id: ClassId) -> bool {
        id == self.object || id == self.cloneable || id == self.serializable
    }
}

/// In-memory declaration store.
///
/// `TypeStore::default()` holds `java.lang.Object`, the primitives and their wrappers, `String`,
/// `CharSequence`, `Comparable`, `Number`, `Cloneable` and `Serializable`.
/// [`TypeStore::with_minimal_jdk`] adds the core collection interfaces on top.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    class_by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    type_param_by_key: HashMap<(String, GenericDeclaration), TypeVarId>,
    well_known: WellKnownTypes,
}

impl Default for TypeStore {
    fn default() -> Self {
        let placeholder = ClassId(0);
        let mut store = TypeStore {
            classes: Vec::new(),
            class_by_name: HashMap::new(),
            type_params: Vec::new(),
            type_param_by_key: HashMap::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
                comparable: placeholder,
                char_sequence: placeholder,
                string: placeholder,
                number: placeholder,
                integer: placeholder,
                primitives: [placeholder; 8],
                wrappers: [placeholder; 8],
            },
        };
        store.define_core_types();
        store
    }
}

impl TypeStore {
    /// Return the id for `name`, allocating an empty placeholder declaration if it is new.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_by_name.get(name) {
            return *id;
        }
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
            fields: Vec::new(),
        });
        self.class_by_name.insert(name.to_string(), id);
        id
    }

    /// Replace the declaration behind an interned id.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) -> Result<()> {
        let slot = self
            .classes
            .get_mut(id.index())
            .ok_or(TypeError::UnknownClass(id))?;
        if slot.name != def.name {
            self.class_by_name.remove(&slot.name);
            self.class_by_name.insert(def.name.clone(), id);
        }
        *slot = def;
        Ok(())
    }

    /// Intern `def.name` and install `def` as its declaration.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        // `intern_class_id` guarantees the slot exists and carries the same name.
        self.classes[id.index()] = def;
        id
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index())
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Return the id for the variable `name` declared by `declaring`, allocating it with no
    /// bounds if it is new.
    pub fn intern_type_param(&mut self, name: &str, declaring: GenericDeclaration) -> TypeVarId {
        let key = (name.to_string(), declaring);
        if let Some(id) = self.type_param_by_key.get(&key) {
            return *id;
        }
        let id = TypeVarId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: key.0.clone(),
            declaring: key.1.clone(),
            upper_bounds: Vec::new(),
        });
        self.type_param_by_key.insert(key, id);
        id
    }

    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) -> Result<()> {
        let slot = self
            .type_params
            .get_mut(id.index())
            .ok_or(TypeError::UnknownTypeVar(id))?;
        let old_key = (slot.name.clone(), slot.declaring.clone());
        if old_key.0 != def.name || old_key.1 != def.declaring {
            self.type_param_by_key.remove(&old_key);
            self.type_param_by_key
                .insert((def.name.clone(), def.declaring.clone()), id);
        }
        *slot = def;
        Ok(())
    }

    pub fn add_type_param(
        &mut self,
        name: &str,
        declaring: GenericDeclaration,
        upper_bounds: Vec<Type>,
    ) -> TypeVarId {
        let id = self.intern_type_param(name, declaring);
        self.type_params[id.index()].upper_bounds = upper_bounds;
        id
    }

    /// Set the bounds of an already allocated variable. Used for self-referential bounds such as
    /// `T extends Comparable<T>`, where the variable must exist before its bound is built.
    pub fn set_type_param_bounds(&mut self, id: TypeVarId, upper_bounds: Vec<Type>) -> Result<()> {
        let slot = self
            .type_params
            .get_mut(id.index())
            .ok_or(TypeError::UnknownTypeVar(id))?;
        slot.upper_bounds = upper_bounds;
        Ok(())
    }

    /// Build `raw<args>`, using the enclosing class of `raw` as owner.
    pub fn parameterize(&self, raw: ClassId, args: Vec<Type>) -> Result<Type> {
        self.parameterize_with_owner(None, raw, args)
    }

    /// Build `owner.raw<args>`.
    ///
    /// A supplied owner requires `raw` to be a nested declaration whose enclosing class the
    /// owner is a subtype of. Without one, the enclosing class (if any) becomes the owner.
    pub fn parameterize_with_owner(
        &self,
        owner: Option<Type>,
        raw: ClassId,
        args: Vec<Type>,
    ) -> Result<Type> {
        let def = self.class(raw).ok_or(TypeError::UnknownClass(raw))?;
        let owner = match (owner, def.enclosing) {
            (None, enclosing) => enclosing.map(Type::Class),
            (Some(owner), Some(enclosing)) => {
                let owner_class = owner.nominal_class();
                let valid = match owner_class {
                    Some(owner_class) => {
                        Resolver::new(self).class_assignable(owner_class, enclosing)?
                    }
                    None => false,
                };
                if !valid {
                    return Err(TypeError::InvalidOwner {
                        owner: format_type(self, &owner),
                        class: def.name.clone(),
                    });
                }
                Some(owner)
            }
            (Some(owner), None) => {
                return Err(TypeError::InvalidOwner {
                    owner: format_type(self, &owner),
                    class: def.name.clone(),
                })
            }
        };
        if def.type_params.len() != args.len() {
            return Err(TypeError::ArgumentCountMismatch {
                class: def.name.clone(),
                expected: def.type_params.len(),
                found: args.len(),
            });
        }
        Ok(match owner {
            Some(owner) => Type::parameterized_with_owner(owner, raw, args),
            None => Type::parameterized(raw, args),
        })
    }

    /// Build `raw<..>` taking each argument from `map`.
    pub fn parameterize_from_map(&self, raw: ClassId, map: &TypeArgMap) -> Result<Type> {
        let def = self.class(raw).ok_or(TypeError::UnknownClass(raw))?;
        let args = def
            .type_params
            .iter()
            .map(|var| {
                map.get(*var)
                    .cloned()
                    .ok_or_else(|| TypeError::MissingBinding {
                        variable: type_var_name(self, *var),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        self.parameterize(raw, args)
    }

    fn define_core_types(&mut self) {
        let object = self.add_class(ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
            fields: Vec::new(),
        });
        self.well_known.object = object;
        let object_ty = Type::Class(object);

        let cloneable = self.add_interface("java.lang.Cloneable", Vec::new(), Vec::new());
        let serializable = self.add_interface("java.io.Serializable", Vec::new(), Vec::new());
        let char_sequence = self.add_interface("java.lang.CharSequence", Vec::new(), Vec::new());

        let comparable = self.intern_class_id("java.lang.Comparable");
        let comparable_t = self.add_type_param(
            "T",
            GenericDeclaration::Class(comparable),
            vec![object_ty.clone()],
        );
        self.add_interface("java.lang.Comparable", vec![comparable_t], Vec::new());
        let comparable_of = |id: ClassId| Type::parameterized(comparable, vec![Type::Class(id)]);

        let string = self.intern_class_id("java.lang.String");
        self.add_class(ClassDef {
            name: "java.lang.String".to_string(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: Some(object_ty.clone()),
            interfaces: vec![
                Type::Class(serializable),
                comparable_of(string),
                Type::Class(char_sequence),
            ],
            enclosing: None,
            fields: Vec::new(),
        });

        let number = self.add_class(ClassDef {
            name: "java.lang.Number".to_string(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: Some(object_ty.clone()),
            interfaces: vec![Type::Class(serializable)],
            enclosing: None,
            fields: Vec::new(),
        });

        let mut primitives = [object; 8];
        let mut wrappers = [object; 8];
        for p in PrimitiveType::ALL {
            primitives[p.index()] = self.add_class(ClassDef {
                name: p.name().to_string(),
                kind: ClassKind::Primitive(p),
                type_params: Vec::new(),
                super_class: None,
                interfaces: Vec::new(),
                enclosing: None,
                fields: Vec::new(),
            });

            let wrapper = self.intern_class_id(p.wrapper_name());
            let super_class = match p {
                PrimitiveType::Boolean | PrimitiveType::Char => object,
                _ => number,
            };
            let mut interfaces = vec![comparable_of(wrapper)];
            if super_class == object {
                interfaces.insert(0, Type::Class(serializable));
            }
            wrappers[p.index()] = self.add_class(ClassDef {
                name: p.wrapper_name().to_string(),
                kind: ClassKind::Class,
                type_params: Vec::new(),
                super_class: Some(Type::Class(super_class)),
                interfaces,
                enclosing: None,
                fields: Vec::new(),
            });
        }

        self.well_known = WellKnownTypes {
            object,
            cloneable,
            serializable,
            comparable,
            char_sequence,
            string,
            number,
            integer: wrappers[PrimitiveType::Int.index()],
            primitives,
            wrappers,
        };
    }

    pub(crate) fn add_interface(
        &mut self,
        name: &str,
        type_params: Vec<TypeVarId>,
        interfaces: Vec<Type>,
    ) -> ClassId {
        self.add_class(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Interface,
            type_params,
            super_class: None,
            interfaces,
            enclosing: None,
            fields: Vec::new(),
        })
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_by_name.get(name) {
            return Some(*id);
        }
        if !name.contains('.') {
            return self.class_by_name.get(&format!("java.lang.{name}")).copied();
        }
        None
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
