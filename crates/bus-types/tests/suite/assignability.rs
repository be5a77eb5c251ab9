use bus_types::{
    GenericDeclaration, PrimitiveType, Resolver, Type, TypeArgMap, TypeEnv, TypeError, TypeStore,
};
use pretty_assertions::assert_eq;

use super::fixtures::{box_fixture, declare, extend, jdk_class, var};

struct Jdk {
    store: TypeStore,
}

impl Jdk {
    fn new() -> Self {
        Self {
            store: TypeStore::with_minimal_jdk(),
        }
    }

    fn class(&self, name: &str) -> Type {
        let id = self
            .store
            .lookup_class(name)
            .or_else(|| self.store.class_id(&format!("java.util.{name}")))
            .unwrap_or_else(|| panic!("unknown class {name}"));
        Type::class(id)
    }

    fn generic(&self, name: &str, args: Vec<Type>) -> Type {
        let Type::Class(id) = self.class(name) else {
            unreachable!()
        };
        Type::parameterized(id, args)
    }

    fn assignable(&self, from: &Type, to: &Type) -> bool {
        Resolver::new(&self.store)
            .is_assignable(Some(from), to, None)
            .unwrap_or_else(|err| panic!("assignability check failed: {err}"))
    }
}

#[test]
fn raw_and_parameterized_interplay() {
    let jdk = Jdk::new();
    let string = jdk.class("String");
    let list = jdk.class("List");
    let list_of_string = jdk.generic("List", vec![string.clone()]);
    let array_list_of_string = jdk.generic("ArrayList", vec![string.clone()]);

    assert!(jdk.assignable(&list_of_string, &list), "erasure");
    assert!(jdk.assignable(&list, &list_of_string), "raw source is unchecked");
    assert!(jdk.assignable(&array_list_of_string, &list_of_string));
    assert!(jdk.assignable(
        &array_list_of_string,
        &jdk.generic("Collection", vec![string.clone()])
    ));
    assert!(!jdk.assignable(&list_of_string, &array_list_of_string));
    assert!(!jdk.assignable(&string, &list_of_string));
}

#[test]
fn wildcard_arguments() {
    let jdk = Jdk::new();
    let integer = jdk.class("Integer");
    let number = jdk.class("Number");
    let string = jdk.class("String");
    let list = |arg: Type| jdk.generic("List", vec![arg]);

    assert!(jdk.assignable(&list(integer.clone()), &list(Type::extends(number.clone()))));
    assert!(!jdk.assignable(&list(number.clone()), &list(Type::extends(integer.clone()))));
    assert!(jdk.assignable(
        &list(Type::extends(integer.clone())),
        &list(Type::extends(number.clone()))
    ));
    assert!(!jdk.assignable(
        &list(Type::extends(number.clone())),
        &list(Type::extends(integer.clone()))
    ));
    assert!(!jdk.assignable(&list(Type::wildcard()), &list(Type::extends(number.clone()))));
    assert!(jdk.assignable(&list(Type::extends(number.clone())), &list(Type::wildcard())));

    assert!(jdk.assignable(&list(number.clone()), &list(Type::super_(integer.clone()))));
    assert!(jdk.assignable(
        &list(Type::super_(number.clone())),
        &list(Type::super_(integer.clone()))
    ));
    assert!(!jdk.assignable(
        &list(Type::super_(integer.clone())),
        &list(Type::super_(number))
    ));
    assert!(!jdk.assignable(&list(string), &list(Type::super_(integer.clone()))));
    assert!(!jdk.assignable(&list(Type::wildcard()), &list(Type::super_(integer))));
}

#[test]
fn nested_arguments_are_invariant() {
    let jdk = Jdk::new();
    let integer = jdk.class("Integer");
    let number = jdk.class("Number");
    let list_of = |arg: Type| jdk.generic("List", vec![arg]);

    let nested_integer = list_of(list_of(integer.clone()));
    let nested_number = list_of(list_of(number.clone()));
    let nested_wild = list_of(Type::extends(list_of(Type::extends(number))));

    assert!(!jdk.assignable(&nested_integer, &nested_number));
    assert!(jdk.assignable(&nested_integer, &nested_wild));
}

#[test]
fn arrays() {
    let jdk = Jdk::new();
    let wk = jdk.store.well_known();
    let string_array = Type::array(jdk.class("String"));
    let object_array = Type::array(jdk.class("Object"));
    let integer_array = Type::array(jdk.class("Integer"));
    let number_array = Type::array(jdk.class("Number"));

    assert!(jdk.assignable(&string_array, &object_array));
    assert!(jdk.assignable(&integer_array, &number_array));
    assert!(!jdk.assignable(&number_array, &integer_array));
    assert!(jdk.assignable(&string_array, &Type::class(wk.serializable)));
    assert!(jdk.assignable(&string_array, &Type::class(wk.object)));
    assert!(!jdk.assignable(&string_array, &jdk.class("String")));
    assert!(!jdk.assignable(&jdk.class("Object"), &object_array));

    let list_of_string = jdk.generic("List", vec![jdk.class("String")]);
    let generic_array = Type::array(list_of_string.clone());
    assert!(jdk.assignable(&generic_array, &Type::class(wk.object)));
    assert!(!jdk.assignable(&generic_array, &Type::class(wk.cloneable)));
    assert!(jdk.assignable(
        &generic_array,
        &Type::array(jdk.generic("Collection", vec![jdk.class("String")]))
    ));
    assert!(!jdk.assignable(&generic_array, &list_of_string));
}

#[test]
fn type_variable_sources_use_their_bounds() {
    let mut store = TypeStore::with_minimal_jdk();
    let (_, vars) = declare(&mut store, "com.example.Holder", &["N"]);
    let wk = store.well_known().clone();
    let n = vars[0];
    store
        .set_type_param_bounds(n, vec![Type::class(wk.number)])
        .expect("bounds");

    let resolver = Resolver::new(&store);
    let assignable = |from: &Type, to: &Type| {
        resolver
            .is_assignable(Some(from), to, None)
            .expect("assignability")
    };

    assert!(assignable(&var(n), &Type::class(wk.number)));
    assert!(assignable(&var(n), &Type::class(wk.object)));
    assert!(!assignable(&var(n), &Type::class(wk.string)));
    assert!(assignable(&Type::array(var(n)), &Type::array(Type::class(wk.number))));
    assert!(!assignable(&Type::array(var(n)), &Type::class(wk.serializable)));
}

#[test]
fn type_variable_targets_resolve_through_context() {
    let fx = box_fixture();
    let wk = fx.store.well_known();
    let resolver = Resolver::new(&fx.store);
    let integer = Type::class(wk.integer);
    let t = var(fx.box_t);

    assert!(!resolver
        .is_assignable(Some(&integer), &t, None)
        .expect("no context"));

    let ctx = TypeArgMap::new().with_binding(fx.box_t, Type::class(wk.number));
    assert!(resolver
        .is_assignable(Some(&integer), &t, Some(&ctx))
        .expect("T = Number"));
    assert!(!resolver
        .is_assignable(Some(&Type::class(wk.string)), &t, Some(&ctx))
        .expect("T = Number"));
    assert!(resolver.is_assignable(None, &t, None).expect("null"));
}

#[test]
fn type_variable_to_type_variable() {
    // <A, B extends A> void m()
    let mut store = TypeStore::with_minimal_jdk();
    let owner = jdk_class(&store, "java.util.List");
    let method = GenericDeclaration::Method {
        owner,
        name: "m".to_string(),
    };
    let a = store.add_type_param("A", method.clone(), vec![]);
    let b = store.add_type_param("B", method, vec![var(a)]);

    let resolver = Resolver::new(&store);
    assert!(resolver
        .is_assignable(Some(&var(b)), &var(a), None)
        .expect("B extends A"));
    assert!(!resolver
        .is_assignable(Some(&var(a)), &var(b), None)
        .expect("A is not a B"));
}

#[test]
fn generic_targets_accept_unresolved_arguments() {
    let mut store = TypeStore::with_minimal_jdk();
    let list = jdk_class(&store, "java.util.List");
    let method = GenericDeclaration::Method {
        owner: list,
        name: "copy".to_string(),
    };
    let t = store.add_type_param("T", method, vec![]);
    let string = Type::class(store.well_known().string);

    let resolver = Resolver::new(&store);
    assert!(resolver
        .is_assignable(
            Some(&Type::parameterized(list, vec![string])),
            &Type::parameterized(list, vec![var(t)]),
            None
        )
        .expect("List<String> -> List<T>"));
}

#[test]
fn boxing_applies_to_class_targets() {
    let jdk = Jdk::new();
    let wk = jdk.store.well_known();
    let int = Type::class(wk.primitive(PrimitiveType::Int));
    let long = Type::class(wk.primitive(PrimitiveType::Long));
    let boolean = Type::class(wk.primitive(PrimitiveType::Boolean));

    assert!(jdk.assignable(&int, &long));
    assert!(!jdk.assignable(&long, &int));
    assert!(jdk.assignable(&int, &jdk.class("Integer")));
    assert!(jdk.assignable(&int, &jdk.generic("Comparable", vec![jdk.class("Integer")])));
    assert!(jdk.assignable(&jdk.class("Integer"), &long));
    assert!(!jdk.assignable(&boolean, &int));
}

#[test]
fn wildcard_array_components_are_rejected() {
    let jdk = Jdk::new();
    let resolver = Resolver::new(&jdk.store);
    let wildcard_array = Type::array(Type::wildcard());
    let string_array = Type::array(jdk.class("String"));
    let misplaced = TypeError::MisplacedWildcard {
        wildcard: "?".to_string(),
        position: "an array component",
    };

    assert_eq!(
        resolver.is_assignable(Some(&wildcard_array), &string_array, None),
        Err(misplaced.clone())
    );
    assert_eq!(
        resolver.is_assignable(Some(&string_array), &wildcard_array, None),
        Err(misplaced)
    );
}

#[test]
fn own_type_variable_arguments_are_checked() {
    // class Box<T>; class Sub<S> extends Box<S>
    let mut fx = box_fixture();
    let (sub, sub_vars) = declare(&mut fx.store, "com.example.Sub", &["S"]);
    let s = var(sub_vars[0]);
    extend(
        &mut fx.store,
        sub,
        Type::parameterized(fx.box_class, vec![s.clone()]),
    );

    let wk = fx.store.well_known().clone();
    let box_class = fx.box_class;
    let box_of = |arg: Type| Type::parameterized(box_class, vec![arg]);
    let resolver = Resolver::new(&fx.store);
    let assignable = |from: &Type, to: &Type| {
        resolver
            .is_assignable(Some(from), to, None)
            .unwrap_or_else(|err| panic!("assignability check failed: {err}"))
    };

    let own = box_of(var(fx.box_t));
    let string_box = box_of(Type::class(wk.string));
    assert!(!assignable(&own, &string_box), "Box<T> -> Box<String>");
    assert!(!assignable(&own, &box_of(Type::class(wk.integer))));
    assert!(!assignable(&string_box, &own), "Box<String> -> Box<T>");
    assert!(assignable(&own, &own));
    assert!(assignable(&own, &box_of(Type::wildcard())));

    let sub_own = Type::parameterized(sub, vec![s.clone()]);
    assert!(!assignable(&sub_own, &string_box), "Sub<S> -> Box<String>");
    assert!(assignable(&sub_own, &box_of(s)));

    // Raw sources stay unchecked.
    assert!(assignable(&Type::class(box_class), &string_box));
    assert!(assignable(&Type::class(sub), &string_box));
}
