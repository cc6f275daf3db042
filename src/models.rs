//! Core data models for storedoctor
//!
//! These models describe the metafield catalog and resource values handed
//! over by the retrieval layer, plus the issues, summaries and reports the
//! analysis produces.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build the `namespace.key` join key used to correlate definitions with values
pub fn composite_key(namespace: &str, key: &str) -> String {
    format!("{namespace}.{key}")
}

/// Resource category a definition is declared for
///
/// Parsed case-insensitively from the remote owner-type string. Every owner
/// type, `Other` included, is held in one canonical uppercase spelling, so
/// `customer` and `CUSTOMER` are the same owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OwnerType {
    Product,
    ProductVariant,
    Collection,
    Shop,
    Other(String),
}

impl OwnerType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "product" => OwnerType::Product,
            "productvariant" => OwnerType::ProductVariant,
            "collection" => OwnerType::Collection,
            "shop" => OwnerType::Shop,
            _ => OwnerType::Other(raw.to_uppercase()),
        }
    }

    /// Remote API spelling of the owner type
    pub fn as_str(&self) -> &str {
        match self {
            OwnerType::Product => "PRODUCT",
            OwnerType::ProductVariant => "PRODUCTVARIANT",
            OwnerType::Collection => "COLLECTION",
            OwnerType::Shop => "SHOP",
            OwnerType::Other(raw) => raw,
        }
    }

    /// Resource type issues about this owner's definitions are reported under
    pub fn resource_type(&self) -> ResourceType {
        match self {
            OwnerType::Product => ResourceType::Product,
            OwnerType::ProductVariant => ResourceType::Variant,
            OwnerType::Collection => ResourceType::Collection,
            OwnerType::Shop | OwnerType::Other(_) => ResourceType::Global,
        }
    }
}

impl From<String> for OwnerType {
    fn from(raw: String) -> Self {
        OwnerType::parse(&raw)
    }
}

impl From<OwnerType> for String {
    fn from(owner: OwnerType) -> Self {
        owner.as_str().to_string()
    }
}

impl std::fmt::Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource type an issue is attributed to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Product,
    Variant,
    Collection,
    Global,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Product => "product",
            ResourceType::Variant => "variant",
            ResourceType::Collection => "collection",
            ResourceType::Global => "global",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of defect an issue describes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    DuplicateNamespace,
    DefinitionWithoutValues,
    ValueWithoutDefinition,
    EmptyMetafield,
    UnusedMetafield,
    LongTextValue,
    SeoDuplicate,
    ValidationMissing,
    /// Issue type written by a newer producer. Never emitted by the rule set.
    #[serde(other)]
    Unknown,
}

impl IssueType {
    /// Every issue type the rule set can emit, in rule order
    pub const ALL: [IssueType; 8] = [
        IssueType::DuplicateNamespace,
        IssueType::DefinitionWithoutValues,
        IssueType::ValueWithoutDefinition,
        IssueType::EmptyMetafield,
        IssueType::UnusedMetafield,
        IssueType::LongTextValue,
        IssueType::SeoDuplicate,
        IssueType::ValidationMissing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::DuplicateNamespace => "duplicate_namespace",
            IssueType::DefinitionWithoutValues => "definition_without_values",
            IssueType::ValueWithoutDefinition => "value_without_definition",
            IssueType::EmptyMetafield => "empty_metafield",
            IssueType::UnusedMetafield => "unused_metafield",
            IssueType::LongTextValue => "long_text_value",
            IssueType::SeoDuplicate => "seo_duplicate",
            IssueType::ValidationMissing => "validation_missing",
            IssueType::Unknown => "unknown",
        }
    }

    /// Human-readable title for reports
    pub fn title(&self) -> &'static str {
        match self {
            IssueType::DuplicateNamespace => "Namespace spans owner types",
            IssueType::DefinitionWithoutValues => "Definition without values",
            IssueType::ValueWithoutDefinition => "Value without definition",
            IssueType::EmptyMetafield => "Empty metafield",
            IssueType::UnusedMetafield => "Unused metafield",
            IssueType::LongTextValue => "Long text value",
            IssueType::SeoDuplicate => "Duplicated SEO value",
            IssueType::ValidationMissing => "Validation missing",
            IssueType::Unknown => "Unknown issue",
        }
    }

    /// Whether the score penalty scales with the number of occurrences
    pub fn is_occurrence_based(&self) -> bool {
        matches!(self, IssueType::EmptyMetafield | IssueType::LongTextValue)
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation rule attached to a definition. Only its presence matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Schema declaration for a metafield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type", default)]
    pub value_type: String,
    #[serde(rename = "ownerType", alias = "owner_type")]
    pub owner_type: OwnerType,
    #[serde(default)]
    pub validations: Vec<ValidationRule>,
}

impl FieldDefinition {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, owner_type: OwnerType) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value_type: "single_line_text_field".to_string(),
            owner_type,
            validations: Vec::new(),
        }
    }

    pub fn with_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn with_validation(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.validations.push(ValidationRule {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn composite_key(&self) -> String {
        composite_key(&self.namespace, &self.key)
    }

    pub fn resource_type(&self) -> ResourceType {
        self.owner_type.resource_type()
    }
}

/// One concrete metafield value stored on a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstance {
    pub namespace: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default)]
    pub value_type: String,
}

impl FieldInstance {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value: Some(value.into()),
            value_type: "single_line_text_field".to_string(),
        }
    }

    /// A field instance whose value is null
    pub fn unset(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value: None,
            value_type: "single_line_text_field".to_string(),
        }
    }

    /// Null and the empty string are both "unset"
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }

    /// The value, unless it is unset
    pub fn present_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn composite_key(&self) -> String {
        composite_key(&self.namespace, &self.key)
    }
}

/// A product or collection with its metafield values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceValue {
    pub id: String,
    #[serde(rename = "metafields", alias = "fields", default)]
    pub fields: Vec<FieldInstance>,
}

impl ResourceValue {
    pub fn new(id: impl Into<String>, fields: Vec<FieldInstance>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Materialized store data handed over by the retrieval layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub definitions: Vec<FieldDefinition>,
    #[serde(default)]
    pub products: Vec<ResourceValue>,
    #[serde(default)]
    pub collections: Vec<ResourceValue>,
}

impl Snapshot {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

/// Structured payload attached to some issue types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueDetails {
    /// Owner types a namespace is spread across
    OwnerTypes { owner_types: Vec<String> },
    /// Value repeated across too many products
    DuplicateValue { duplicate_value: String },
}

/// One detected defect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub namespace: String,
    /// `"*"` when the issue covers a whole namespace
    pub key: String,
    pub resource_type: ResourceType,
    pub issue_type: IssueType,
    pub occurrences: u32,
    #[serde(default)]
    pub details: Option<IssueDetails>,
}

impl IssueRecord {
    /// Create an issue with a single occurrence and no details
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
        resource_type: ResourceType,
        issue_type: IssueType,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            resource_type,
            issue_type,
            occurrences: 1,
            details: None,
        }
    }

    pub fn with_occurrences(mut self, occurrences: u32) -> Self {
        self.occurrences = occurrences;
        self
    }

    pub fn with_details(mut self, details: IssueDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Identity used to match the same issue across runs
    pub fn identity(&self) -> (&str, &str, ResourceType, IssueType) {
        (&self.namespace, &self.key, self.resource_type, self.issue_type)
    }
}

/// Qualitative band of a quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    Good,
    Fair,
    Poor,
}

impl QualityLabel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => QualityLabel::Good,
            s if s >= 50 => QualityLabel::Fair,
            _ => QualityLabel::Poor,
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityLabel::Good => write!(f, "Good"),
            QualityLabel::Fair => write!(f, "Fair"),
            QualityLabel::Poor => write!(f, "Poor"),
        }
    }
}

/// Issue count and summed occurrences for one resource type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTally {
    pub issue_count: usize,
    pub total_occurrences: u64,
}

/// Totals for one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_definitions: usize,
    pub total_metafields: usize,
    pub total_issues: usize,
    pub quality_score: u32,
    pub quality_label: QualityLabel,
    /// Summed occurrences per issue type
    #[serde(default)]
    pub issues_by_type: BTreeMap<IssueType, u64>,
    #[serde(default)]
    pub issues_by_resource_type: BTreeMap<ResourceType, ResourceTally>,
}

impl ScanSummary {
    pub fn from_issues(
        total_definitions: usize,
        total_metafields: usize,
        issues: &[IssueRecord],
        quality_score: u32,
    ) -> Self {
        let mut issues_by_type: BTreeMap<IssueType, u64> = BTreeMap::new();
        let mut issues_by_resource_type: BTreeMap<ResourceType, ResourceTally> = BTreeMap::new();

        for issue in issues {
            *issues_by_type.entry(issue.issue_type).or_insert(0) += u64::from(issue.occurrences);

            let tally = issues_by_resource_type.entry(issue.resource_type).or_default();
            tally.issue_count += 1;
            tally.total_occurrences += u64::from(issue.occurrences);
        }

        Self {
            total_definitions,
            total_metafields,
            total_issues: issues.len(),
            quality_score,
            quality_label: QualityLabel::from_score(quality_score),
            issues_by_type,
            issues_by_resource_type,
        }
    }
}

/// Issues and summary of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: ScanSummary,
    pub issues: Vec<IssueRecord>,
}

impl AnalysisReport {
    pub fn new(
        total_definitions: usize,
        total_metafields: usize,
        issues: Vec<IssueRecord>,
        quality_score: u32,
    ) -> Self {
        Self {
            summary: ScanSummary::from_issues(
                total_definitions,
                total_metafields,
                &issues,
                quality_score,
            ),
            issues,
        }
    }

    pub fn score(&self) -> u32 {
        self.summary.quality_score
    }
}
