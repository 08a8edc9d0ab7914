use crate::error::{Error, Result};
use crate::output::DIRECTIONS;
use crate::render::{FeatureStyle, PolicyRegistry, RenderingPolicy, GENERIC};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dossier.toml";

/// Main configuration: the build manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub jobs: Vec<JobConfig>,
    pub reports: Vec<ReportConfig>,
    pub diagram: DiagramConfig,
    /// Extra rendering policies, added to (or replacing) the built-in ones
    pub policies: Vec<RenderingPolicy>,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    /// Directory every relative path is resolved against
    pub root: PathBuf,
}

/// One compilation job: JSON sources rendered into a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub title: String,
    /// Directory holding the job's JSON sources
    #[serde(default = "default_sources_dir")]
    pub sources_dir: PathBuf,
    pub output: PathBuf,
    /// Policy for sources that don't name one
    #[serde(default = "default_policy")]
    pub policy: String,
    pub sources: Vec<SourceEntry>,
}

/// A source within a job, in output order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Heading text; derived from the file name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Consecutive sources sharing a group are written under one group heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features_heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_style: Option<FeatureStyle>,
}

/// One compiled report: existing markdown files joined into one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub title: String,
    #[serde(default = "default_docs_dir")]
    pub inputs_dir: PathBuf,
    pub output: PathBuf,
    pub inputs: Vec<String>,
}

/// Diagram settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub enabled: bool,
    pub output: PathBuf,
    /// Layout direction (TD, TB, LR, BT, RL)
    pub direction: String,
}

fn default_sources_dir() -> PathBuf {
    PathBuf::from("search_results")
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_policy() -> String {
    GENERIC.to_string()
}

impl SourceEntry {
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            policy: None,
            title: None,
            group: None,
            features_heading: None,
            feature_style: None,
        }
    }

    fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    fn with_features_heading(mut self, heading: &str) -> Self {
        self.features_heading = Some(heading.to_string());
        self
    }

    fn with_feature_style(mut self, style: FeatureStyle) -> Self {
        self.feature_style = Some(style);
        self
    }
}

impl JobConfig {
    fn builtin(name: &str, title: &str, output: &str, policy: &str, sources: Vec<SourceEntry>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            sources_dir: default_sources_dir(),
            output: PathBuf::from(output),
            policy: policy.to_string(),
            sources,
        }
    }

    /// Policy name in effect for `entry`
    pub fn policy_for<'a>(&'a self, entry: &'a SourceEntry) -> &'a str {
        entry.policy.as_deref().unwrap_or(&self.policy)
    }
}

impl ReportConfig {
    fn builtin(name: &str, title: &str, inputs_dir: &str, output: &str, inputs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            inputs_dir: PathBuf::from(inputs_dir),
            output: PathBuf::from(output),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn sources(files: &[&str]) -> Vec<SourceEntry> {
    files.iter().map(|f| SourceEntry::new(f)).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            jobs: default_jobs(),
            reports: default_reports(),
            diagram: DiagramConfig::default(),
            policies: Vec::new(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Multi-Payment Gateway Billing System".to_string(),
            root: PathBuf::from("."),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output: PathBuf::from("design/system_architecture_diagram.md"),
            direction: "TD".to_string(),
        }
    }
}

fn default_jobs() -> Vec<JobConfig> {
    const HST: &str = "HST Compliance (Toronto, Ontario)";
    const US_TAX: &str = "US Tax Reporting Standards";

    vec![
        JobConfig::builtin(
            "gateways",
            "Payment Gateway API Analysis",
            "docs/payment_gateway_analysis.md",
            "gateway",
            sources(&[
                "btcpay_api.json",
                "woocommerce_api.json",
                "revenuecat_api.json",
                "lemonsqueezy_api.json",
                "helcim_api.json",
                "square_api.json",
                "stripe_api.json",
            ]),
        ),
        JobConfig::builtin(
            "tax",
            "Tax Compliance Requirements",
            "docs/tax_compliance.md",
            "tax",
            vec![
                SourceEntry::new("hst_requirements_detailed.json").in_group(HST),
                SourceEntry::new("hst_remittance_details.json").in_group(HST),
                SourceEntry::new("us_tax_requirements.json").in_group(US_TAX),
            ],
        ),
        JobConfig::builtin(
            "architecture",
            "Modern Billing System Architecture",
            "docs/billing_system_architecture.md",
            "architecture",
            sources(&[
                "billing_architecture_orb.json",
                "billing_architecture_thoughtworks.json",
                "software_architecture_patterns_simform.json",
            ]),
        ),
        JobConfig::builtin(
            "standards",
            "Standards-Based Formats and Extensible Frameworks",
            "docs/standards_and_frameworks.md",
            "standards",
            sources(&[
                "json_schema_billing.json",
                "openapi_subscription.json",
                "schema_org_invoice.json",
                "billing_data_model_vertabelo.json",
                "protege_ontology.json",
            ]),
        ),
        JobConfig::builtin(
            "security",
            "Security and PCI Compliance",
            "docs/security_and_compliance.md",
            "security",
            vec![
                SourceEntry::new("pci_dss_12_requirements.json")
                    .with_features_heading("The 12 PCI DSS Requirements"),
                SourceEntry::new("stripe_pci_compliance.json")
                    .with_features_heading("Stripe and PCI Compliance")
                    .with_feature_style(FeatureStyle::Bullets),
                SourceEntry::new("payment_security_best_practices.json")
                    .with_features_heading("Security Best Practices"),
            ],
        ),
        JobConfig::builtin(
            "ui_ux",
            "Modern UI/UX Trends for Billing Portals",
            "docs/ui_ux_trends.md",
            "ui_ux",
            vec![
                SourceEntry::new("ui_ux_trends_bizbot.json").with_features_heading(
                    "10 Design Tips for a User-Friendly Subscription Management Experience",
                ),
                SourceEntry::new("ui_ux_trends_ehousestudio.json").with_features_heading(
                    "6 UX Guidelines for a Better Subscription Management Experience",
                ),
                SourceEntry::new("ui_ux_trends_brainhub.json")
                    .with_features_heading("Key Fintech UX Design Trends for 2025"),
            ],
        ),
    ]
}

fn default_reports() -> Vec<ReportConfig> {
    vec![
        ReportConfig::builtin(
            "research",
            "Comprehensive Research Analysis: Multi-Payment Gateway Billing System",
            "docs",
            "docs/comprehensive_billing_system_research.md",
            &[
                "payment_gateway_analysis.md",
                "tax_compliance.md",
                "billing_system_architecture.md",
                "standards_and_frameworks.md",
                "security_and_compliance.md",
                "ui_ux_trends.md",
            ],
        ),
        ReportConfig::builtin(
            "design",
            "Comprehensive Design: Multi-Payment Gateway Billing System",
            "design",
            "design/comprehensive_billing_system_design.md",
            &[
                "system_architecture.md",
                "database_schema.md",
                "api_design.md",
                "payment_gateway_integration.md",
                "tax_compliance.md",
                "security_architecture.md",
                "extensible_ontology_framework.md",
                "ui_ux_wireframes.md",
                "technology_stack.md",
            ],
        ),
    ]
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or return the built-in manifest if the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, root: Option<PathBuf>, no_diagram: bool) {
        if let Some(root) = root {
            self.project.root = root;
        }

        if no_diagram {
            self.diagram.enabled = false;
        }
    }

    /// Built-in policies plus any declared in the config
    pub fn policy_registry(&self) -> PolicyRegistry {
        let mut registry = PolicyRegistry::builtin();
        for policy in &self.policies {
            registry.register(policy.clone());
        }
        registry
    }

    /// Resolve a path from the config against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.project.root.join(path)
    }

    pub fn job(&self, name: &str) -> Result<&JobConfig> {
        self.jobs
            .iter()
            .find(|job| job.name == name)
            .ok_or_else(|| Error::UnknownJob(name.to_string()))
    }

    pub fn report(&self, name: &str) -> Result<&ReportConfig> {
        self.reports
            .iter()
            .find(|report| report.name == name)
            .ok_or_else(|| Error::UnknownJob(name.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let registry = self.policy_registry();
        let mut names = HashSet::new();

        for policy in &self.policies {
            if policy.name.is_empty() {
                return Err(Error::config_validation("policy name cannot be empty"));
            }
        }

        for job in &self.jobs {
            if !names.insert(job.name.as_str()) {
                return Err(Error::config_validation(format!("duplicate job name: {}", job.name)));
            }
            if job.output.as_os_str().is_empty() {
                return Err(Error::config_validation(format!("job {} has no output path", job.name)));
            }
            if job.sources.is_empty() {
                return Err(Error::config_validation(format!("job {} has no sources", job.name)));
            }
            for entry in &job.sources {
                let policy = job.policy_for(entry);
                if !registry.contains(policy) {
                    return Err(Error::config_validation(format!(
                        "job {} references unknown policy: {}",
                        job.name, policy
                    )));
                }
            }
        }

        for report in &self.reports {
            if !names.insert(report.name.as_str()) {
                return Err(Error::config_validation(format!(
                    "duplicate job name: {}",
                    report.name
                )));
            }
            if report.output.as_os_str().is_empty() {
                return Err(Error::config_validation(format!(
                    "report {} has no output path",
                    report.name
                )));
            }
            if report.inputs.is_empty() {
                return Err(Error::config_validation(format!("report {} has no inputs", report.name)));
            }
        }

        if self.diagram.enabled && self.diagram.output.as_os_str().is_empty() {
            return Err(Error::config_validation("diagram output path cannot be empty"));
        }
        if !DIRECTIONS.contains(&self.diagram.direction.as_str()) {
            return Err(Error::config_validation(format!(
                "diagram direction must be one of {}: {}",
                DIRECTIONS.join(", "),
                self.diagram.direction
            )));
        }

        Ok(())
    }
}
