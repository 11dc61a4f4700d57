use proptest::prelude::*;
use synapse_host::config::Config;
use synapse_host::path::ModulePath;
use synapse_host::registry::DuplicatePolicy;

// Property: any dot-joined sequence of valid identifiers parses, displays
// back to itself, and reports the right segment count.
proptest! {
    #[test]
    fn test_module_path_round_trip(
        segments in proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,12}", 1..5),
    ) {
        let joined = segments.join(".");
        let path = ModulePath::parse(&joined).expect("valid path must parse");
        prop_assert_eq!(path.to_string(), joined);
        prop_assert_eq!(path.segments().count(), segments.len());
    }
}

// Property: a segment that starts with a digit poisons the whole path.
proptest! {
    #[test]
    fn test_module_path_rejects_leading_digit_segment(
        prefix in proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,8}", 0..3),
        bad in "[0-9][a-zA-Z0-9_]{0,8}",
    ) {
        let mut segments = prefix;
        segments.push(bad);
        let joined = segments.join(".");
        prop_assert!(ModulePath::parse(&joined).is_err());
    }
}

// Property: join never produces an unparsable path.
proptest! {
    #[test]
    fn test_join_output_reparses(
        root in "[a-zA-Z_][a-zA-Z0-9_]{0,8}",
        child in "[a-zA-Z_][a-zA-Z0-9_]{0,8}",
    ) {
        let path = ModulePath::parse(&root).expect("valid root");
        let joined = path.join(&child).expect("valid child");
        prop_assert!(ModulePath::parse(joined.as_str()).is_ok());
        prop_assert_eq!(joined.parent(), Some(path));
    }
}

// Property: configuration round-trips through TOML.
proptest! {
    #[test]
    fn test_config_round_trip(
        log_level in "error|warn|info|debug|trace",
        reject in proptest::bool::ANY,
    ) {
        let baseline = r#"
[host]
log_level = "info"
extension_dir = "/opt/synapse/extensions"

[registry]
duplicate_alias = "overwrite"
"#;
        let mut config: Config = toml::from_str(baseline).expect("parse baseline");
        config.host.log_level = log_level;
        config.registry.duplicate_alias = if reject {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Overwrite
        };

        let serialized = toml::to_string(&config).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("reparse");

        prop_assert_eq!(parsed.host.log_level, config.host.log_level);
        prop_assert_eq!(parsed.host.extension_dir, config.host.extension_dir);
        prop_assert_eq!(parsed.registry.duplicate_alias, config.registry.duplicate_alias);
    }
}
