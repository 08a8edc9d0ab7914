// Rendering policies
//
// A policy is a declarative table describing how one topic family's records
// turn into markdown. Built-in policies cover the research topics the default
// manifest compiles; more can be declared in the config file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative rendering rules for one topic family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingPolicy {
    pub name: String,
    /// When the per-source heading is written
    pub heading: HeadingRule,
    pub heading_level: usize,
    /// Suffix removed from the file stem before deriving the display name
    pub trim_suffix: Option<String>,
    /// Render the summary as `**{label}:** text` instead of a bare paragraph
    pub summary_label: Option<String>,
    pub specifications: Vec<SpecShape>,
    pub features: FeatureSection,
    pub challenges: ChallengeSection,
}

/// When a source's display-name heading is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeadingRule {
    /// Every loaded source gets a heading
    #[default]
    Always,
    /// Only sources with a summary get a heading, placed above the summary
    WithSummary,
    /// Sources are never headed individually
    Never,
}

/// How a section title is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    H2,
    #[default]
    H3,
    H4,
    /// A bold label, `**Title:**`
    Label,
}

/// How name/description feature entries are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureStyle {
    /// `*   **name**: description`
    #[default]
    Bullets,
    /// `**name**` followed by the description as a paragraph
    Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSection {
    pub heading: Option<String>,
    pub heading_style: HeadingStyle,
    pub style: FeatureStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeSection {
    pub heading: Option<String>,
    pub heading_style: HeadingStyle,
}

/// A recognized sub-shape of the `specifications` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecShape {
    /// `key: { name: { field: ... } }`, one subheading per name
    NamedItems {
        key: String,
        heading: Option<String>,
        #[serde(default)]
        title_case_names: bool,
        fields: Vec<FieldSpec>,
    },
    /// `key: { name: { field: text } }`, one bullet per name
    LabeledMap {
        key: String,
        heading: Option<String>,
        field: String,
    },
    /// `key: [ { property, expected_type, description } ]`
    PropertyList {
        key: String,
        heading: Option<String>,
    },
    /// Every key of the specification object as a bold-labelled outline
    Outline,
}

/// One labelled field of a named item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub format: FieldFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    /// Inline text
    #[default]
    Text,
    /// Inline, list elements joined with ", "
    Join,
    /// Nested bullet per list element
    List,
    /// Nested bullet per `{ type, entity }` element
    Relationships,
}

impl FieldSpec {
    pub fn new(key: &str, label: &str, format: FieldFormat) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            format,
        }
    }
}

impl Default for RenderingPolicy {
    fn default() -> Self {
        Self {
            name: GENERIC.to_string(),
            heading: HeadingRule::Always,
            heading_level: 2,
            trim_suffix: None,
            summary_label: None,
            specifications: Vec::new(),
            features: FeatureSection::default(),
            challenges: ChallengeSection::default(),
        }
    }
}

impl Default for FeatureSection {
    fn default() -> Self {
        Self {
            heading: Some("Key Features".to_string()),
            heading_style: HeadingStyle::H3,
            style: FeatureStyle::Bullets,
        }
    }
}

impl Default for ChallengeSection {
    fn default() -> Self {
        Self {
            heading: Some("Challenges and Solutions".to_string()),
            heading_style: HeadingStyle::H3,
        }
    }
}

/// Name of the fallback policy
pub const GENERIC: &str = "generic";

impl RenderingPolicy {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Payment gateway API extracts: labelled summary and categorized capabilities
    pub fn gateway() -> Self {
        let mut policy = Self::named("gateway");
        policy.trim_suffix = Some("_api".to_string());
        policy.summary_label = Some("Summary".to_string());
        policy.features.heading_style = HeadingStyle::Label;
        policy
    }

    /// Billing architecture write-ups: styles, components, patterns, challenges
    pub fn architecture() -> Self {
        let mut policy = Self::named("architecture");
        policy.heading = HeadingRule::WithSummary;
        policy.specifications = vec![
            SpecShape::NamedItems {
                key: "architectural_styles".to_string(),
                heading: Some("Architectural Styles".to_string()),
                title_case_names: true,
                fields: vec![
                    FieldSpec::new("description", "Description", FieldFormat::Text),
                    FieldSpec::new("pros", "Pros", FieldFormat::Text),
                    FieldSpec::new("cons", "Cons", FieldFormat::Text),
                ],
            },
            SpecShape::LabeledMap {
                key: "core_components".to_string(),
                heading: Some("Core Components".to_string()),
                field: "responsibility".to_string(),
            },
        ];
        policy.features.heading = Some("Key Features & Patterns".to_string());
        policy.challenges.heading = Some("Challenges and Solutions in EDA".to_string());
        policy
    }

    /// Data-format standards and ontology frameworks
    pub fn standards() -> Self {
        let mut policy = Self::named("standards");
        policy.specifications = vec![
            SpecShape::PropertyList {
                key: "properties".to_string(),
                heading: Some("Invoice Properties (Schema.org)".to_string()),
            },
            SpecShape::NamedItems {
                key: "Entities".to_string(),
                heading: Some("Billing System Entities (Vertabelo)".to_string()),
                title_case_names: false,
                fields: vec![
                    FieldSpec::new("description", "Description", FieldFormat::Text),
                    FieldSpec::new("attributes", "Attributes", FieldFormat::Join),
                    FieldSpec::new("relationships", "Relationships", FieldFormat::Relationships),
                ],
            },
        ];
        policy
    }

    /// Tax requirements: outlined specifications and categorized details
    pub fn tax() -> Self {
        let mut policy = Self::named("tax");
        policy.heading = HeadingRule::Never;
        policy.specifications = vec![SpecShape::Outline];
        policy.features.heading = None;
        policy
    }

    /// Security and compliance guidance
    pub fn security() -> Self {
        let mut policy = Self::named("security");
        policy.features.style = FeatureStyle::Paragraphs;
        policy
    }

    /// UI/UX trend roundups
    pub fn ui_ux() -> Self {
        let mut policy = Self::named("ui_ux");
        policy.features.style = FeatureStyle::Paragraphs;
        policy
    }

    /// Apply per-source overrides of the feature section
    pub fn with_feature_overrides(
        &self,
        heading: Option<&str>,
        style: Option<FeatureStyle>,
    ) -> Self {
        let mut policy = self.clone();
        if let Some(heading) = heading {
            policy.features.heading = Some(heading.to_string());
        }
        if let Some(style) = style {
            policy.features.style = style;
        }
        policy
    }
}

/// Policies by name
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    policies: BTreeMap<String, RenderingPolicy>,
}

impl PolicyRegistry {
    /// Registry holding only the built-in policies
    pub fn builtin() -> Self {
        let mut registry = Self {
            policies: BTreeMap::new(),
        };
        for policy in [
            RenderingPolicy::default(),
            RenderingPolicy::gateway(),
            RenderingPolicy::architecture(),
            RenderingPolicy::standards(),
            RenderingPolicy::tax(),
            RenderingPolicy::security(),
            RenderingPolicy::ui_ux(),
        ] {
            registry.register(policy);
        }
        registry
    }

    /// Add or replace a policy
    pub fn register(&mut self, policy: RenderingPolicy) {
        self.policies.insert(policy.name.clone(), policy);
    }

    pub fn get(&self, name: &str) -> Result<&RenderingPolicy> {
        self.policies
            .get(name)
            .ok_or_else(|| Error::UnknownPolicy(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = PolicyRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["architecture", "gateway", "generic", "security", "standards", "tax", "ui_ux"]
        );
        assert!(registry.get("tax").is_ok());
    }

    #[test]
    fn test_unknown_policy() {
        let registry = PolicyRegistry::builtin();
        let err = registry.get("astrology").unwrap_err();
        assert!(matches!(err, Error::UnknownPolicy(name) if name == "astrology"));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = PolicyRegistry::builtin();
        let mut custom = RenderingPolicy::default();
        custom.summary_label = Some("Overview".to_string());
        registry.register(custom);
        assert_eq!(
            registry.get(GENERIC).unwrap().summary_label.as_deref(),
            Some("Overview")
        );
    }

    #[test]
    fn test_feature_overrides() {
        let policy = RenderingPolicy::security()
            .with_feature_overrides(Some("Stripe and PCI Compliance"), Some(FeatureStyle::Bullets));
        assert_eq!(policy.features.heading.as_deref(), Some("Stripe and PCI Compliance"));
        assert_eq!(policy.features.style, FeatureStyle::Bullets);
        assert_eq!(policy.name, "security");
    }

    #[test]
    fn test_policy_from_toml() {
        let toml_str = r#"
name = "vendors"
heading = "with_summary"
summary_label = "Overview"

[features]
heading = "Capabilities"
heading_style = "label"
style = "paragraphs"

[[specifications]]
kind = "named_items"
key = "products"
heading = "Products"
fields = [
    { key = "description", label = "Description" },
    { key = "regions", label = "Regions", format = "join" },
]

[[specifications]]
kind = "outline"
"#;
        let policy: RenderingPolicy = toml::from_str(toml_str).unwrap();
        assert_eq!(policy.name, "vendors");
        assert_eq!(policy.heading, HeadingRule::WithSummary);
        assert_eq!(policy.heading_level, 2);
        assert_eq!(policy.features.heading_style, HeadingStyle::Label);
        assert_eq!(policy.features.style, FeatureStyle::Paragraphs);
        assert_eq!(policy.specifications.len(), 2);
        assert!(matches!(
            &policy.specifications[0],
            SpecShape::NamedItems { fields, title_case_names: false, .. } if fields[1].format == FieldFormat::Join
        ));
        assert_eq!(policy.specifications[1], SpecShape::Outline);
        // Unspecified sections keep their defaults
        assert_eq!(policy.challenges.heading.as_deref(), Some("Challenges and Solutions"));
    }
}
