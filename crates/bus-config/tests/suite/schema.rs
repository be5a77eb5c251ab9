use bus_config::json_schema;

#[test]
fn schema_describes_both_sections() {
    let value = serde_json::to_value(json_schema()).expect("schema serializes");

    let properties = value
        .pointer("/properties")
        .and_then(|v| v.as_object())
        .expect("root properties");
    assert!(properties.contains_key("logging"));
    assert!(properties.contains_key("resolver"));
    assert_eq!(
        value.pointer("/additionalProperties"),
        Some(&serde_json::Value::Bool(false))
    );
}

#[test]
fn resolver_limits_have_a_lower_bound() {
    let value = serde_json::to_value(json_schema()).expect("schema serializes");
    for field in ["max_depth", "max_variable_chain"] {
        let minimum = value
            .pointer(&format!("/definitions/ResolverOptions/properties/{field}/minimum"))
            .and_then(|v| v.as_f64());
        assert_eq!(minimum, Some(1.0), "{field}");
    }
}
