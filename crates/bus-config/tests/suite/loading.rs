use bus_config::{BusConfig, ConfigError, LoggingConfig};
use bus_types::{ResolverOptions, Type, TypeArgMap, TypeEnv, TypeError, TypeStore};
use pretty_assertions::assert_eq;

#[test]
fn loads_resolver_and_logging_sections_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bus.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "Debug"
json = true
stderr = false
file = "bus.log"

[resolver]
max_depth = 8
use_cache = false
"#,
    )
    .expect("write config");

    let config = BusConfig::load_from_path(&path).expect("load config");
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "Debug".to_owned(),
            json: true,
            stderr: false,
            file: Some("bus.log".into()),
        }
    );
    assert_eq!(
        config.resolver,
        ResolverOptions {
            max_depth: 8,
            max_variable_chain: ResolverOptions::DEFAULT_MAX_VARIABLE_CHAIN,
            use_cache: false,
        }
    );
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let err = BusConfig::load_from_path(&path).expect_err("file does not exist");
    match err {
        ConfigError::Io { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string())
        }
        other => panic!("expected an io error, got {other:?}"),
    }
}

#[test]
fn unknown_keys_are_rejected() {
    let err = BusConfig::load_from_str("[resolver]\nmax_hops = 3\n").expect_err("unknown key");
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn zero_limits_fail_validation() {
    for text in [
        "[resolver]\nmax_depth = 0\n",
        "[resolver]\nmax_variable_chain = 0\n",
    ] {
        let err = BusConfig::load_from_str(text).expect_err("zero limit");
        assert!(matches!(err, ConfigError::Invalid(_)), "{text}: {err:?}");
    }
}

#[test]
fn configured_limits_reach_the_resolver() {
    // class A extends B; class B extends A
    let mut store = TypeStore::default();
    let object = store.well_known().object;
    let a = store.intern_class_id("com.example.A");
    let b = store.intern_class_id("com.example.B");
    store.class_mut(a).expect("A").super_class = Some(Type::class(b));
    store.class_mut(b).expect("B").super_class = Some(Type::class(a));

    let config = BusConfig::load_from_str("[resolver]\nmax_depth = 16\n").expect("config");
    let err = config
        .resolver(&store)
        .resolve_arguments(&Type::class(a), object, &TypeArgMap::new())
        .expect_err("cycle never reaches Object");
    assert_eq!(err, TypeError::RecursionLimit { limit: 16 });
}

#[test]
fn tracing_is_installed_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logging = LoggingConfig {
        level: "bus_types=debug".to_owned(),
        json: true,
        stderr: false,
        file: Some(dir.path().join("bus.log")),
    };

    let _ = bus_config::init_tracing(&logging);
    assert!(!bus_config::init_tracing(&logging));
}
