//! A small slice of `java.util`, enough to exercise multi-level generic hierarchies in tests and
//! downstream tooling without a real class path.

use crate::{ClassDef, ClassId, ClassKind, GenericDeclaration, Type, TypeEnv, TypeStore};

impl TypeStore {
    /// `TypeStore::default()` plus `Iterable`, `Collection`, `List`, `Set`, `AbstractCollection`,
    /// `AbstractList`, `ArrayList`, `Map`, `Map.Entry` and `HashMap`.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::default();
        let object = Type::Class(store.well_known().object);
        let cloneable = Type::Class(store.well_known().cloneable);
        let serializable = Type::Class(store.well_known().serializable);

        let (iterable, _) = declare(&mut store, "java.lang.Iterable", ClassKind::Interface, &["T"]);

        let (collection, e) = declare(
            &mut store,
            "java.util.Collection",
            ClassKind::Interface,
            &["E"],
        );
        set_supers(
            &mut store,
            collection,
            None,
            vec![Type::parameterized(iterable, e.clone())],
        );

        let (list, e) = declare(&mut store, "java.util.List", ClassKind::Interface, &["E"]);
        set_supers(
            &mut store,
            list,
            None,
            vec![Type::parameterized(collection, e.clone())],
        );

        let (set, e) = declare(&mut store, "java.util.Set", ClassKind::Interface, &["E"]);
        set_supers(
            &mut store,
            set,
            None,
            vec![Type::parameterized(collection, e.clone())],
        );

        let (abstract_collection, e) = declare(
            &mut store,
            "java.util.AbstractCollection",
            ClassKind::Class,
            &["E"],
        );
        set_supers(
            &mut store,
            abstract_collection,
            Some(object.clone()),
            vec![Type::parameterized(collection, e.clone())],
        );

        let (abstract_list, e) = declare(
            &mut store,
            "java.util.AbstractList",
            ClassKind::Class,
            &["E"],
        );
        set_supers(
            &mut store,
            abstract_list,
            Some(Type::parameterized(abstract_collection, e.clone())),
            vec![Type::parameterized(list, e.clone())],
        );

        let (array_list, e) = declare(&mut store, "java.util.ArrayList", ClassKind::Class, &["E"]);
        set_supers(
            &mut store,
            array_list,
            Some(Type::parameterized(abstract_list, e.clone())),
            vec![
                Type::parameterized(list, e.clone()),
                cloneable.clone(),
                serializable.clone(),
            ],
        );

        let (map, _) = declare(&mut store, "java.util.Map", ClassKind::Interface, &["K", "V"]);

        let (entry, _) = declare(
            &mut store,
            "java.util.Map$Entry",
            ClassKind::Interface,
            &["K", "V"],
        );
        if let Some(def) = store.class_mut(entry) {
            def.enclosing = Some(map);
        }

        let (hash_map, kv) = declare(&mut store, "java.util.HashMap", ClassKind::Class, &["K", "V"]);
        set_supers(
            &mut store,
            hash_map,
            Some(object),
            vec![Type::parameterized(map, kv), cloneable, serializable],
        );

        store
    }
}

/// Declare a generic class whose parameters are bounded by `Object`, with no supertypes yet.
fn declare(
    store: &mut TypeStore,
    name: &str,
    kind: ClassKind,
    params: &[&str],
) -> (ClassId, Vec<Type>) {
    let id = store.intern_class_id(name);
    let object = Type::Class(store.well_known().object);
    let type_params: Vec<_> = params
        .iter()
        .map(|param| store.add_type_param(param, GenericDeclaration::Class(id), vec![object.clone()]))
        .collect();
    let vars = type_params.iter().copied().map(Type::TypeVar).collect();
    store.add_class(ClassDef {
        name: name.to_string(),
        kind,
        type_params,
        super_class: None,
        interfaces: Vec::new(),
        enclosing: None,
        fields: Vec::new(),
    });
    (id, vars)
}

fn set_supers(
    store: &mut TypeStore,
    id: ClassId,
    super_class: Option<Type>,
    interfaces: Vec<Type>,
) {
    if let Some(def) = store.class_mut(id) {
        def.super_class = super_class;
        def.interfaces = interfaces;
    }
}
