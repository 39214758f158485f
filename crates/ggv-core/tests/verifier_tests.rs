use ggv_core::{
    compare_warnings, read_json, Comparison, ConfigError, ExperimentInput, RawRule, Verifier,
    VerifierConfig, VerifierError, VerifySummary, WarningCategory,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const TOML_CONFIG: &str = r#"
name = "rest"
ignored_modules = ["log"]
extra_requirements = ["optional-rule"]

[[patterns]]
name = "mockgenerate-attribute"
regex = "mock_.*"
mock = true

[[patterns]]
name = "generate-resource"
regex = "audit_.*"
reachable_by_construction = true

[[patterns]]
name = "require"
regex = "post_.*"
required_by_default = true

[[patterns]]
name = "GET"
regex = ".*"
"#;

const YAML_CONFIG: &str = r#"
name: rest
ignored_modules: [log]
extra_requirements: [optional-rule]
patterns:
  - name: mockgenerate-attribute
    regex: "mock_.*"
    mock: true
  - name: generate-resource
    regex: "audit_.*"
    reachable_by_construction: true
  - name: require
    regex: "post_.*"
    required_by_default: true
  - name: GET
    regex: ".*"
"#;

fn json_config() -> String {
    json!({
        "name": "rest",
        "ignored_modules": ["log"],
        "extra_requirements": ["optional-rule"],
        "patterns": [
            {"name": "mockgenerate-attribute", "regex": "mock_.*", "mock": true},
            {"name": "generate-resource", "regex": "audit_.*", "reachable_by_construction": true},
            {"name": "require", "regex": "post_.*", "required_by_default": true},
            {"name": "GET", "regex": ".*"}
        ]
    })
    .to_string()
}

fn experiment_json() -> serde_json::Value {
    let rows = json!({"get_user": {}, "post_user": {}, "mock_session": {}, "audit_log": {}});
    json!({
        "name": "users-v1",
        "grammar": {
            "rules": [
                {"name": "get_user", "mapsToOperation": "users.get", "contains": {"modules": ["app"]}},
                {"name": "post_user", "contains": {"modules": ["app"], "resources": ["user"]}},
                {"name": "mock_session"},
                {"name": "audit_log", "contains": {"modules": ["log"], "resources": ["entry"]}}
            ],
            "modules": [{"id": "app"}, {"id": "log"}],
            "resources": [{"id": "user", "module": "app"}, {"id": "entry", "module": "log"}]
        },
        "criticalPairs": [
            {
                "type": "PRODUCE_USE_DEPENDENCY",
                "pairs": {
                    "get_user": {},
                    "post_user": {"post_user": 1},
                    "mock_session": {"get_user": 1, "audit_log": 2},
                    "audit_log": {}
                }
            },
            {"type": "PRODUCE_FORBID_CONFLICT", "pairs": rows}
        ]
    })
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_config_formats_agree() {
    let dir = TempDir::new().unwrap();
    let from_toml = VerifierConfig::from_path(write_file(&dir, "rest.toml", TOML_CONFIG)).unwrap();
    let from_yaml = VerifierConfig::from_path(write_file(&dir, "rest.yaml", YAML_CONFIG)).unwrap();
    let from_json =
        VerifierConfig::from_path(write_file(&dir, "rest.json", &json_config())).unwrap();

    assert_eq!(from_toml, from_yaml);
    assert_eq!(from_toml, from_json);
    assert_eq!(from_toml.patterns.len(), 4);
    assert_eq!(from_toml.main_requirements, vec![WarningCategory::UnreachableOperation]);
}

#[test]
fn test_config_errors() {
    let dir = TempDir::new().unwrap();

    let missing = VerifierConfig::from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    let ini = VerifierConfig::from_path(write_file(&dir, "rest.ini", TOML_CONFIG)).unwrap_err();
    assert!(matches!(ini, ConfigError::UnsupportedFormat(_)));

    let broken = VerifierConfig::from_path(write_file(&dir, "rest.toml", "name = ")).unwrap_err();
    assert!(matches!(broken, ConfigError::Parse { .. }));
}

#[test]
fn test_verify_experiment_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input_path = write_file(&dir, "users-v1.json", &experiment_json().to_string());
    let input: ExperimentInput = read_json(&input_path).unwrap();

    let verifier = Verifier::new(VerifierConfig::from_toml_str(TOML_CONFIG).unwrap()).unwrap();
    let analysis = verifier.verify_input(&input).unwrap();

    assert_eq!(analysis.experiment, "users-v1");
    assert_eq!(analysis.verifier, "rest");

    let data = &analysis.report.data;
    assert!(data.rule("mock_session").unwrap().mock);
    assert!(data.rule("audit_log").unwrap().reachable_by_construction);
    assert!(data.is_reachable("audit_log"));
    assert!(!data.is_reachable("get_user"));
    assert!(data.grammar.modules.iter().all(|m| m.id != "log"));

    let main = &analysis.results.main_requirements;
    assert!(!main.passed);
    assert_eq!(main.data.len(), 1);
    assert_eq!(main.data[0].get("rule"), Some("get_user"));
    assert_eq!(main.data[0].get("operation"), Some("users.get"));
    assert!(!analysis.passed());

    let extra: Vec<&str> = analysis
        .results
        .extra_requirements
        .data
        .iter()
        .filter_map(|w| w.get("rule"))
        .collect();
    assert_eq!(extra, vec!["audit_log", "get_user"]);

    assert!(analysis.results.extra_warnings.passed);
}

#[test]
fn test_ignored_modules_change_extra_warnings() {
    let input: ExperimentInput = serde_json::from_value(experiment_json()).unwrap();

    let strict = VerifierConfig::from_yaml_str(YAML_CONFIG).unwrap();
    let mut lenient = strict.clone();
    lenient.ignored_modules.clear();

    let with_log = Verifier::new(lenient).unwrap().verify_input(&input).unwrap();
    let without_log = Verifier::new(strict).unwrap().verify_input(&input).unwrap();

    let kinds: Vec<WarningCategory> = with_log
        .results
        .extra_warnings
        .data
        .iter()
        .map(|w| w.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![WarningCategory::OptionalModule, WarningCategory::OptionalResource]
    );

    let result = compare_warnings(&with_log, &without_log);
    assert_eq!(result.comparison, Comparison::ProperSuperset);
    assert!(result.comparison.is_non_regressive_candidate());
}

#[test]
fn test_unmatched_rule_names_verifier_and_rule() {
    let config = VerifierConfig::from_json_str(
        r#"{"name": "narrow", "patterns": [{"name": "GET", "regex": "get_.*"}]}"#,
    )
    .unwrap();
    let verifier = Verifier::new(config).unwrap();

    let err = verifier
        .decorate_rules(&[RawRule::new("get_user"), RawRule::new("post_user")])
        .unwrap_err();
    assert_eq!(err.to_string(), "verifier 'narrow': rule 'post_user' matches no pattern");
}

#[test]
fn test_structural_error_propagates() {
    let mut value = experiment_json();
    value["criticalPairs"][1]["pairs"]["ghost"] = json!({});
    let input: ExperimentInput = serde_json::from_value(value).unwrap();

    let verifier = Verifier::new(VerifierConfig::from_toml_str(TOML_CONFIG).unwrap()).unwrap();
    let err = verifier.verify_input(&input).unwrap_err();
    assert!(matches!(err, VerifierError::Structure(_)));
}

#[test]
fn test_summary_counts() {
    let input: ExperimentInput = serde_json::from_value(experiment_json()).unwrap();
    let verifier = Verifier::new(VerifierConfig::from_toml_str(TOML_CONFIG).unwrap()).unwrap();
    let analysis = verifier.verify_input(&input).unwrap();

    let mut summary = VerifySummary::new(verifier.name());
    summary.add(&analysis);

    let entry = &summary.experiments["users-v1"];
    assert!(!entry.main_requirements);
    assert_eq!(entry.warnings[&WarningCategory::UnreachableOperation], 1);
    assert_eq!(entry.warnings[&WarningCategory::OptionalRule], 2);
    assert_eq!(summary.passed(), 0);
}

#[test]
fn test_analysis_json_shape() {
    let input: ExperimentInput = serde_json::from_value(experiment_json()).unwrap();
    let verifier = Verifier::new(VerifierConfig::from_toml_str(TOML_CONFIG).unwrap()).unwrap();
    let analysis = verifier.verify_input(&input).unwrap();

    let value = serde_json::to_value(&analysis).unwrap();
    assert!(value["report"]["warnings"].is_array());
    assert_eq!(value["results"]["mainRequirements"]["passed"], json!(false));
    assert!(value["results"]["extraWarnings"]["data"].is_array());
}
