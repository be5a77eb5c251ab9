use bus_types::{
    actual_type_for, normalize_upper_bounds, resolve_arguments, Resolver, Type, TypeArgMap,
    TypeEnv, TypeError, TypeStore, WildcardType,
};
use pretty_assertions::assert_eq;

use super::fixtures::{
    add_field, box_fixture, declare, declare_interface, extend, implement, jdk_class, var,
};

#[test]
fn int_box_resolves_box_parameter_to_integer() {
    let fx = box_fixture();
    let integer = Type::class(fx.store.well_known().integer);

    let map = resolve_arguments(
        &fx.store,
        &Type::class(fx.int_box),
        fx.box_class,
        &TypeArgMap::new(),
    )
    .expect("resolve")
    .expect("IntBox is a Box");
    assert_eq!(map.get(fx.box_t), Some(&integer));

    let actual = actual_type_for(&fx.store, &Type::class(fx.int_box), fx.box_class, &var(fx.box_t))
        .expect("actual type");
    assert_eq!(actual, integer);

    let field = Resolver::new(&fx.store)
        .resolve_field_type(&Type::class(fx.int_box), fx.box_class, "value")
        .expect("field type");
    assert_eq!(field, Some(integer));
}

#[test]
fn variable_is_carried_through_intermediate_generic_class() {
    // class A<T>; class B<T> extends A<T>; class C extends B<String>
    let mut store = TypeStore::with_minimal_jdk();
    let (a, a_vars) = declare(&mut store, "com.example.A", &["T"]);
    let (b, b_vars) = declare(&mut store, "com.example.B", &["T"]);
    let (c, _) = declare(&mut store, "com.example.C", &[]);
    extend(&mut store, b, Type::parameterized(a, vec![var(b_vars[0])]));
    let string = Type::class(store.well_known().string);
    extend(&mut store, c, Type::parameterized(b, vec![string.clone()]));

    let map = resolve_arguments(&store, &Type::class(c), a, &TypeArgMap::new())
        .expect("resolve")
        .expect("C is an A");
    assert_eq!(map.get(a_vars[0]), Some(&string));
    assert_eq!(map.get(b_vars[0]), Some(&string));
}

#[test]
fn unrelated_subject_resolves_to_none() {
    let fx = box_fixture();
    let string = Type::class(fx.store.well_known().string);
    assert_eq!(
        resolve_arguments(&fx.store, &string, fx.box_class, &TypeArgMap::new()),
        Ok(None)
    );

    let expression = var(fx.box_t);
    assert_eq!(
        actual_type_for(&fx.store, &string, fx.box_class, &expression),
        Ok(expression)
    );
}

#[test]
fn collection_hierarchy_resolves_through_interfaces() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = jdk_class(&store, "java.util.ArrayList");
    let iterable = jdk_class(&store, "java.lang.Iterable");
    let string = Type::class(store.well_known().string);
    let iterable_t = store.class(iterable).expect("Iterable").type_params[0];

    let map = resolve_arguments(
        &store,
        &Type::parameterized(array_list, vec![string.clone()]),
        iterable,
        &TypeArgMap::new(),
    )
    .expect("resolve")
    .expect("ArrayList is Iterable");
    assert_eq!(map.get(iterable_t), Some(&string));
}

#[test]
fn primitive_subject_boxes_before_walking() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known();
    let int = Type::class(wk.primitive(bus_types::PrimitiveType::Int));
    let comparable_t = store.class(wk.comparable).expect("Comparable").type_params[0];

    let map = resolve_arguments(&store, &int, wk.comparable, &TypeArgMap::new())
        .expect("resolve")
        .expect("int boxes to a Comparable");
    assert_eq!(map.get(comparable_t), Some(&Type::class(wk.integer)));

    let long = wk.primitive(bus_types::PrimitiveType::Long);
    let map = resolve_arguments(&store, &int, long, &TypeArgMap::new())
        .expect("resolve")
        .expect("int widens to long");
    assert!(map.is_empty());
}

#[test]
fn nested_type_sees_owner_arguments() {
    // class Outer<T> { class Inner<U> { Map<T, U> pairs; } }
    let mut store = TypeStore::with_minimal_jdk();
    let map_class = jdk_class(&store, "java.util.Map");
    let (outer, outer_vars) = declare(&mut store, "com.example.Outer", &["T"]);
    let (inner, inner_vars) = declare(&mut store, "com.example.Outer$Inner", &["U"]);
    store.class_mut(inner).expect("Inner").enclosing = Some(outer);
    add_field(
        &mut store,
        inner,
        "pairs",
        Type::parameterized(map_class, vec![var(outer_vars[0]), var(inner_vars[0])]),
    );

    let wk = store.well_known().clone();
    let owner = store
        .parameterize(outer, vec![Type::class(wk.string)])
        .expect("Outer<String>");
    let context = store
        .parameterize_with_owner(Some(owner), inner, vec![Type::class(wk.integer)])
        .expect("Outer<String>.Inner<Integer>");

    let field = Resolver::new(&store)
        .resolve_field_type(&context, inner, "pairs")
        .expect("field type");
    assert_eq!(
        field,
        Some(Type::parameterized(
            map_class,
            vec![Type::class(wk.string), Type::class(wk.integer)]
        ))
    );
}

#[test]
fn list_variance_scenarios() {
    let store = TypeStore::with_minimal_jdk();
    let list = jdk_class(&store, "java.util.List");
    let wk = store.well_known();
    let string = Type::class(wk.string);
    let char_sequence = Type::class(wk.char_sequence);

    let list_of_string = Type::parameterized(list, vec![string.clone()]);
    let list_of_sequences = Type::parameterized(list, vec![Type::extends(char_sequence.clone())]);
    let list_of_char_sequence = Type::parameterized(list, vec![char_sequence]);

    let resolver = Resolver::new(&store);
    assert!(resolver
        .is_assignable(Some(&list_of_string), &list_of_sequences, None)
        .expect("List<String> -> List<? extends CharSequence>"));
    assert!(!resolver
        .is_assignable(Some(&list_of_char_sequence), &list_of_string, None)
        .expect("List<CharSequence> -> List<String>"));
}

#[test]
fn unbounded_wildcard_is_bounded_by_object() {
    let store = TypeStore::default();
    let resolver = Resolver::new(&store);
    assert_eq!(
        resolver.implicit_upper_bounds(&WildcardType::unbounded()),
        vec![Type::class(store.well_known().object)]
    );
}

#[test]
fn bound_normalization_scenarios() {
    let store = TypeStore::default();
    let wk = store.well_known();
    let number = Type::class(wk.number);
    let comparable_number = Type::parameterized(wk.comparable, vec![number.clone()]);

    assert_eq!(
        normalize_upper_bounds(&store, &[number.clone(), comparable_number.clone()]),
        Ok(vec![number.clone(), comparable_number])
    );
    assert_eq!(
        normalize_upper_bounds(&store, &[number.clone(), Type::class(wk.object)]),
        Ok(vec![number])
    );
}

#[test]
fn self_binding_is_a_cycle() {
    let fx = box_fixture();
    let map = TypeArgMap::new().with_binding(fx.box_t, var(fx.box_t));

    let err = Resolver::new(&fx.store)
        .unroll_variable_chain(fx.box_t, &map)
        .expect_err("T -> T");
    assert_eq!(
        err,
        TypeError::VariableCycle {
            variable: "T".to_string()
        }
    );
}

#[test]
fn cyclic_interfaces_still_resolve_reachable_targets() {
    // interface I<T> extends J<T>; interface J<T> extends I<T>; interface K extends I<String>
    let mut store = TypeStore::default();
    let (i, i_vars) = declare_interface(&mut store, "com.example.I", &["T"]);
    let (j, j_vars) = declare_interface(&mut store, "com.example.J", &["T"]);
    implement(&mut store, i, Type::parameterized(j, vec![var(i_vars[0])]));
    implement(&mut store, j, Type::parameterized(i, vec![var(j_vars[0])]));
    let (k, _) = declare_interface(&mut store, "com.example.K", &[]);
    let string = Type::class(store.well_known().string);
    implement(&mut store, k, Type::parameterized(i, vec![string.clone()]));

    let serializable = store.well_known().serializable;
    let resolver = Resolver::new(&store);
    assert_eq!(
        resolver.resolve_arguments(&Type::class(k), serializable, &TypeArgMap::new()),
        Ok(None)
    );

    let map = resolver
        .resolve_arguments(&Type::class(k), j, &TypeArgMap::new())
        .expect("resolve")
        .expect("K is a J");
    assert_eq!(map.get(j_vars[0]), Some(&string));
}

#[test]
fn cyclic_superclasses_hit_the_recursion_limit() {
    // class A extends B; class B extends A
    let mut store = TypeStore::default();
    let (a, _) = declare(&mut store, "com.example.A", &[]);
    let (b, _) = declare(&mut store, "com.example.B", &[]);
    extend(&mut store, a, Type::class(b));
    extend(&mut store, b, Type::class(a));

    let object = store.well_known().object;
    let options = bus_types::ResolverOptions {
        max_depth: 32,
        ..Default::default()
    };
    let err = Resolver::new(&store)
        .with_options(options)
        .resolve_arguments(&Type::class(a), object, &TypeArgMap::new())
        .expect_err("walk never reaches Object");
    assert_eq!(err, TypeError::RecursionLimit { limit: 32 });
}

#[test]
fn determine_type_arguments_runs_in_reverse() {
    // class StringList<T> extends ArrayList<T>
    let mut store = TypeStore::with_minimal_jdk();
    let array_list = jdk_class(&store, "java.util.ArrayList");
    let list = jdk_class(&store, "java.util.List");
    let (string_list, vars) = declare(&mut store, "com.example.StringList", &["T"]);
    extend(
        &mut store,
        string_list,
        Type::parameterized(array_list, vec![var(vars[0])]),
    );
    let string = Type::class(store.well_known().string);

    let map = Resolver::new(&store)
        .determine_type_arguments(string_list, &Type::parameterized(list, vec![string.clone()]))
        .expect("determine")
        .expect("StringList is a List");
    assert_eq!(map.get(vars[0]), Some(&string));
}

#[test]
fn satisfied_variables_respect_self_referential_bounds() {
    // class Sorted<T extends Comparable<T>>
    let mut store = TypeStore::default();
    let (_, vars) = declare(&mut store, "com.example.Sorted", &["T"]);
    let t = vars[0];
    let wk = store.well_known().clone();
    store
        .set_type_param_bounds(t, vec![Type::parameterized(wk.comparable, vec![var(t)])])
        .expect("bounds");

    let resolver = Resolver::new(&store);
    let strings = TypeArgMap::new().with_binding(t, Type::class(wk.string));
    let numbers = TypeArgMap::new().with_binding(t, Type::class(wk.number));
    assert_eq!(resolver.types_satisfy_variables(&strings), Ok(true));
    assert_eq!(resolver.types_satisfy_variables(&numbers), Ok(false));
}

#[test]
fn malformed_subjects_report_their_error() {
    let mut store = TypeStore::with_minimal_jdk();
    let list = jdk_class(&store, "java.util.List");
    let object = store.well_known().object;
    let string = store.well_known().string;

    let err = Resolver::new(&store)
        .resolve_arguments(&Type::array(Type::wildcard()), object, &TypeArgMap::new())
        .expect_err("wildcard component");
    assert_eq!(
        err,
        TypeError::MisplacedWildcard {
            wildcard: "?".to_string(),
            position: "an array component",
        }
    );

    let err = Resolver::new(&store)
        .resolve_arguments(&Type::parameterized(list, vec![]), list, &TypeArgMap::new())
        .expect_err("List needs one argument");
    assert_eq!(
        err,
        TypeError::ArgumentCountMismatch {
            class: "java.util.List".to_string(),
            expected: 1,
            found: 0,
        }
    );

    // class Weird<T> extends T
    let (weird, vars) = declare(&mut store, "com.example.Weird", &["T"]);
    extend(&mut store, weird, var(vars[0]));
    let resolver = Resolver::new(&store);
    let non_nominal = TypeError::NonNominalSupertype {
        class: "com.example.Weird".to_string(),
        edge: "T".to_string(),
    };
    assert_eq!(
        resolver.resolve_arguments(&Type::class(weird), object, &TypeArgMap::new()),
        Err(non_nominal.clone())
    );
    assert_eq!(
        resolver.is_assignable(Some(&Type::class(weird)), &Type::class(string), None),
        Err(non_nominal)
    );
}
