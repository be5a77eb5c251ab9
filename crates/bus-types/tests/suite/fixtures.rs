use bus_types::{
    ClassDef, ClassId, ClassKind, FieldDef, GenericDeclaration, Type, TypeEnv, TypeStore, TypeVarId,
};

/// Declare `name` with unbounded type parameters `params`, extending `Object`.
pub fn declare(store: &mut TypeStore, name: &str, params: &[&str]) -> (ClassId, Vec<TypeVarId>) {
    declare_kind(store, name, ClassKind::Class, params)
}

pub fn declare_interface(
    store: &mut TypeStore,
    name: &str,
    params: &[&str],
) -> (ClassId, Vec<TypeVarId>) {
    declare_kind(store, name, ClassKind::Interface, params)
}

fn declare_kind(
    store: &mut TypeStore,
    name: &str,
    kind: ClassKind,
    params: &[&str],
) -> (ClassId, Vec<TypeVarId>) {
    let id = store.intern_class_id(name);
    let vars: Vec<TypeVarId> = params
        .iter()
        .map(|p| store.add_type_param(p, GenericDeclaration::Class(id), vec![]))
        .collect();
    let super_class = match kind {
        ClassKind::Interface => None,
        _ => Some(Type::class(store.well_known().object)),
    };
    store.add_class(ClassDef {
        name: name.to_string(),
        kind,
        type_params: vars.clone(),
        super_class,
        interfaces: vec![],
        enclosing: None,
        fields: vec![],
    });
    (id, vars)
}

pub fn extend(store: &mut TypeStore, class: ClassId, super_class: Type) {
    store.class_mut(class).expect("declared class").super_class = Some(super_class);
}

pub fn implement(store: &mut TypeStore, class: ClassId, interface: Type) {
    store
        .class_mut(class)
        .expect("declared class")
        .interfaces
        .push(interface);
}

pub fn add_field(store: &mut TypeStore, class: ClassId, name: &str, ty: Type) {
    store
        .class_mut(class)
        .expect("declared class")
        .fields
        .push(FieldDef {
            name: name.to_string(),
            ty,
        });
}

pub fn jdk_class(store: &TypeStore, name: &str) -> ClassId {
    store
        .class_id(name)
        .unwrap_or_else(|| panic!("{name} should be part of the minimal JDK"))
}

pub fn var(id: TypeVarId) -> Type {
    Type::TypeVar(id)
}

/// `Box<T>` with a field `value: T`, and `IntBox extends Box<Integer>`.
pub struct BoxFixture {
    pub store: TypeStore,
    pub box_class: ClassId,
    pub box_t: TypeVarId,
    pub int_box: ClassId,
}

pub fn box_fixture() -> BoxFixture {
    let mut store = TypeStore::with_minimal_jdk();
    let (box_class, vars) = declare(&mut store, "com.example.Box", &["T"]);
    let box_t = vars[0];
    add_field(&mut store, box_class, "value", var(box_t));

    let (int_box, _) = declare(&mut store, "com.example.IntBox", &[]);
    let integer = Type::class(store.well_known().integer);
    extend(
        &mut store,
        int_box,
        Type::parameterized(box_class, vec![integer]),
    );

    BoxFixture {
        store,
        box_class,
        box_t,
        int_box,
    }
}
