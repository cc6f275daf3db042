//! Library-level contract tests
//!
//! Drives the public API (snapshot -> analyzer -> scorer -> report) the way an
//! embedding application would.

use storedoctor::config::ProjectConfig;
use storedoctor::models::{
    FieldDefinition, FieldInstance, IssueDetails, IssueRecord, IssueType, OwnerType, ResourceType,
    ResourceValue, Snapshot,
};
use storedoctor::rules::{AnalysisError, Analyzer};
use storedoctor::scoring::calculate_score;

fn def(namespace: &str, key: &str, owner: &str) -> FieldDefinition {
    FieldDefinition::new(namespace, key, OwnerType::parse(owner))
}

fn validated(namespace: &str, key: &str, owner: &str) -> FieldDefinition {
    def(namespace, key, owner).with_validation("max", "100")
}

fn product(id: usize, fields: Vec<FieldInstance>) -> ResourceValue {
    ResourceValue::new(format!("gid://shop/Product/{id}"), fields)
}

fn analyze(
    definitions: &[FieldDefinition],
    products: &[ResourceValue],
    collections: &[ResourceValue],
) -> Vec<IssueRecord> {
    Analyzer::default()
        .analyze(definitions, products, collections)
        .expect("analysis succeeds")
}

fn of_type(issues: &[IssueRecord], issue_type: IssueType) -> Vec<&IssueRecord> {
    issues.iter().filter(|i| i.issue_type == issue_type).collect()
}

#[test]
fn test_analysis_is_deterministic() {
    let definitions = vec![
        def("custom", "color", "PRODUCT"),
        def("custom", "banner", "COLLECTION"),
        def("seo", "title", "PRODUCT"),
    ];
    let products: Vec<_> = (0..30)
        .map(|i| {
            product(
                i,
                vec![
                    FieldInstance::new("seo", "title", if i % 2 == 0 { "A" } else { "B" }),
                    FieldInstance::new("custom", "color", ""),
                    FieldInstance::new("legacy", "sku", format!("sku-{i}")),
                ],
            )
        })
        .collect();

    let first = analyze(&definitions, &products, &[]);
    let second = analyze(&definitions, &products, &[]);
    assert_eq!(first, second);

    let parallel = Analyzer::builder()
        .rules(storedoctor::rules::default_rules(&Default::default()))
        .workers(4)
        .build()
        .analyze(&definitions, &products, &[])
        .unwrap();
    assert_eq!(first, parallel);
}

#[test]
fn test_duplicate_namespace_across_owner_types() {
    let issues = analyze(
        &[def("custom", "color", "PRODUCT"), def("custom", "width", "COLLECTION")],
        &[],
        &[],
    );
    let dup = of_type(&issues, IssueType::DuplicateNamespace);
    assert_eq!(dup.len(), 1);
    assert_eq!(dup[0].namespace, "custom");
    assert_eq!(dup[0].key, "*");
    assert_eq!(dup[0].resource_type, ResourceType::Global);
    assert_eq!(dup[0].occurrences, 2);

    let single_owner = analyze(
        &[def("custom", "color", "PRODUCT"), def("custom", "width", "product")],
        &[],
        &[],
    );
    assert!(of_type(&single_owner, IssueType::DuplicateNamespace).is_empty());
}

#[test]
fn test_definition_without_values_and_unused() {
    let definitions = [validated("custom", "color", "PRODUCT")];

    let issues = analyze(&definitions, &[], &[]);
    assert_eq!(of_type(&issues, IssueType::DefinitionWithoutValues).len(), 1);
    assert_eq!(of_type(&issues, IssueType::UnusedMetafield).len(), 1);

    let products = [product(1, vec![FieldInstance::new("custom", "color", "red")])];
    let issues = analyze(&definitions, &products, &[]);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_present_but_empty_value_is_unused_not_missing() {
    let definitions = [validated("custom", "color", "PRODUCT")];
    let products = [product(1, vec![FieldInstance::unset("custom", "color")])];

    let issues = analyze(&definitions, &products, &[]);
    assert!(of_type(&issues, IssueType::DefinitionWithoutValues).is_empty());
    assert_eq!(of_type(&issues, IssueType::UnusedMetafield).len(), 1);
    assert_eq!(of_type(&issues, IssueType::EmptyMetafield).len(), 1);
}

#[test]
fn test_value_without_definition_reported_once() {
    let products: Vec<_> = (0..25)
        .map(|i| product(i, vec![FieldInstance::new("orphan", "tag", "hello")]))
        .collect();

    let issues = analyze(&[], &products, &[]);
    let orphans = of_type(&issues, IssueType::ValueWithoutDefinition);
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].occurrences, 1);
    assert_eq!(orphans[0].resource_type, ResourceType::Product);
}

#[test]
fn test_empty_values_counted_per_resource_type() {
    let definitions = [validated("custom", "color", "PRODUCT")];
    let products = [
        product(1, vec![FieldInstance::new("custom", "color", "")]),
        product(2, vec![FieldInstance::new("custom", "color", "")]),
    ];
    let collections = [ResourceValue::new(
        "gid://shop/Collection/1",
        vec![FieldInstance::unset("custom", "color")],
    )];

    let issues = analyze(&definitions, &products, &collections);
    let empty = of_type(&issues, IssueType::EmptyMetafield);
    assert_eq!(empty.len(), 2);
    assert_eq!(empty[0].resource_type, ResourceType::Product);
    assert_eq!(empty[0].occurrences, 2);
    assert_eq!(empty[1].resource_type, ResourceType::Collection);
    assert_eq!(empty[1].occurrences, 1);
}

#[test]
fn test_long_text_boundary() {
    let definitions = [validated("custom", "story", "PRODUCT")];

    let at_limit = [product(1, vec![FieldInstance::new("custom", "story", "a".repeat(500))])];
    assert!(of_type(&analyze(&definitions, &at_limit, &[]), IssueType::LongTextValue).is_empty());

    let over = [product(1, vec![FieldInstance::new("custom", "story", "a".repeat(501))])];
    let issues = analyze(&definitions, &over, &[]);
    assert_eq!(of_type(&issues, IssueType::LongTextValue).len(), 1);
}

#[test]
fn test_seo_duplicate_threshold() {
    let definitions = [validated("seo", "title", "PRODUCT")];
    let with_copies = |n: usize| -> Vec<ResourceValue> {
        (0..n)
            .map(|i| product(i, vec![FieldInstance::new("seo", "title", "Generic Title")]))
            .collect()
    };

    let issues = analyze(&definitions, &with_copies(10), &[]);
    let seo = of_type(&issues, IssueType::SeoDuplicate);
    assert_eq!(seo.len(), 1);
    assert_eq!(seo[0].occurrences, 10);
    assert_eq!(
        seo[0].details,
        Some(IssueDetails::DuplicateValue {
            duplicate_value: "Generic Title".to_string()
        })
    );

    let issues = analyze(&definitions, &with_copies(9), &[]);
    assert!(of_type(&issues, IssueType::SeoDuplicate).is_empty());
}

#[test]
fn test_validation_missing() {
    let issues = analyze(
        &[def("custom", "a", "PRODUCT"), validated("custom", "b", "PRODUCT")],
        &[],
        &[],
    );
    let missing = of_type(&issues, IssueType::ValidationMissing);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].key, "a");
}

#[test]
fn test_issues_follow_rule_order() {
    let definitions = [def("custom", "color", "PRODUCT"), def("custom", "banner", "SHOP")];
    let issues = analyze(&definitions, &[], &[]);

    let order: Vec<IssueType> = issues.iter().map(|i| i.issue_type).collect();
    assert_eq!(
        order,
        vec![
            IssueType::DuplicateNamespace,
            IssueType::DefinitionWithoutValues,
            IssueType::DefinitionWithoutValues,
            IssueType::UnusedMetafield,
            IssueType::UnusedMetafield,
            IssueType::ValidationMissing,
            IssueType::ValidationMissing,
        ]
    );
    assert_eq!(issues[2].resource_type, ResourceType::Global);
}

#[test]
fn test_scoring_weights_and_bounds() {
    assert_eq!(calculate_score(&[]), 100);

    let dup = IssueRecord::new("custom", "*", ResourceType::Global, IssueType::DuplicateNamespace)
        .with_occurrences(3);
    assert_eq!(calculate_score(&[dup.clone()]), 90);

    let empty = IssueRecord::new("custom", "color", ResourceType::Product, IssueType::EmptyMetafield)
        .with_occurrences(25);
    assert_eq!(calculate_score(&[empty]), 97);

    let many = vec![dup; 50];
    assert_eq!(calculate_score(&many), 0);
}

#[test]
fn test_invalid_input_is_rejected() {
    let products = [product(1, vec![FieldInstance::new("", "color", "red")])];
    let result = Analyzer::default().analyze(&[], &products, &[]);
    assert!(matches!(result, Err(AnalysisError::MissingIdentity { .. })));
}

#[test]
fn test_run_analysis_from_snapshot_json() {
    let json = r#"{
        "definitions": [
            {"namespace": "custom", "key": "color", "type": "single_line_text_field",
             "ownerType": "PRODUCT", "validations": [{"name": "choices", "value": "[\"red\"]"}]},
            {"namespace": "custom", "key": "hero", "ownerType": "COLLECTION"}
        ],
        "products": [
            {"id": "gid://shop/Product/1", "metafields": [
                {"namespace": "custom", "key": "color", "value": "red"},
                {"namespace": "orphan", "key": "tag", "value": null}
            ]}
        ],
        "collections": []
    }"#;
    let snapshot = Snapshot::from_json(json).unwrap();
    let report =
        storedoctor::run_analysis(&snapshot, &ProjectConfig::default(), &[], 2).unwrap();

    assert_eq!(report.summary.total_definitions, 2);
    assert_eq!(report.summary.total_metafields, 2);
    assert_eq!(report.summary.total_issues, report.issues.len());
    assert_eq!(report.score(), calculate_score(&report.issues));

    let types: Vec<IssueType> = report.issues.iter().map(|i| i.issue_type).collect();
    assert_eq!(
        types,
        vec![
            IssueType::DuplicateNamespace,
            IssueType::DefinitionWithoutValues,
            IssueType::ValueWithoutDefinition,
            IssueType::EmptyMetafield,
            IssueType::UnusedMetafield,
            IssueType::ValidationMissing,
        ]
    );
}

#[test]
fn test_run_analysis_honors_config_and_skip_list() {
    let snapshot = Snapshot {
        definitions: vec![def("custom", "color", "PRODUCT")],
        ..Default::default()
    };
    let config: ProjectConfig = toml::from_str(
        r#"
[rules.unused-metafield]
enabled = false

[scoring.penalties]
validation_missing = 20
"#,
    )
    .unwrap();

    let report =
        storedoctor::run_analysis(&snapshot, &config, &["DefinitionWithoutValues".to_string()], 1)
            .unwrap();

    let types: Vec<IssueType> = report.issues.iter().map(|i| i.issue_type).collect();
    assert_eq!(types, vec![IssueType::ValidationMissing]);
    assert_eq!(report.score(), 80);
}

#[test]
fn test_issue_record_field_names_are_stable() {
    let issue = IssueRecord::new("custom", "*", ResourceType::Global, IssueType::DuplicateNamespace)
        .with_occurrences(2)
        .with_details(IssueDetails::OwnerTypes {
            owner_types: vec!["PRODUCT".into(), "SHOP".into()],
        });
    let value = serde_json::to_value(&issue).unwrap();

    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["details", "issue_type", "key", "namespace", "occurrences", "resource_type"]
    );
    assert_eq!(value["issue_type"], "duplicate_namespace");
    assert_eq!(value["resource_type"], "global");
    assert_eq!(value["details"]["owner_types"][1], "SHOP");
}
