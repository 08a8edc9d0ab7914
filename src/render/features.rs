// Feature-list entries
//
// Research extracts describe features in several incompatible shapes. Each
// entry is classified by the keys it carries; shapes nobody recognizes are
// dropped quietly.

use super::block::MarkdownBlock;
use super::policy::FeatureStyle;
use crate::record::{field, first_field, list_field, text, text_field};
use serde_json::Value;

/// Keys that can name a plain feature entry, in lookup order
const NAME_KEYS: &[&str] = &["name", "trend_name", "title"];

/// A feature entry resolved to one known shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureEntry {
    /// A named design pattern with its trade-offs
    Pattern {
        name: String,
        description: Option<String>,
        use_cases: Vec<String>,
        shortcomings: Vec<String>,
    },
    /// A category of named items or capabilities
    Category {
        category: String,
        items: Vec<CategoryItem>,
    },
    /// A category with free-text details
    Details {
        category: String,
        details: Vec<String>,
    },
    /// An ordinal entry such as a numbered requirement or tip
    Numbered {
        number: String,
        title: String,
        description: Option<String>,
    },
    /// A name with a description
    Named { name: String, description: String },
    /// A bare scalar
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryItem {
    Named { name: String, description: String },
    Text(String),
}

impl FeatureEntry {
    /// Classify an entry by the keys present, or `None` if no shape matches
    pub fn classify(value: &Value) -> Option<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Array(_) | Value::Null => return None,
            scalar => {
                let s = text(scalar);
                return (!s.is_empty()).then_some(FeatureEntry::Plain(s));
            }
        };

        if let Some(name) = text_field(value, "pattern_name") {
            return Some(FeatureEntry::Pattern {
                name,
                description: text_field(value, "description"),
                use_cases: texts(list_field(value, "use_cases")),
                shortcomings: texts(list_field(value, "shortcomings")),
            });
        }

        if let Some(category) = text_field(value, "category") {
            if let Some(items) = first_field(value, &["items", "capabilities"]) {
                let items: Vec<CategoryItem> = match items {
                    Value::Array(items) => items.iter().filter_map(CategoryItem::classify).collect(),
                    other => CategoryItem::classify(other).into_iter().collect(),
                };
                return Some(FeatureEntry::Category { category, items });
            }
            if let Some(details) = field(value, "details") {
                let details = match details {
                    Value::Array(items) => texts(items),
                    other => vec![text(other)],
                };
                return Some(FeatureEntry::Details { category, details });
            }
        }

        let number = map
            .iter()
            .find(|(key, v)| key.ends_with("_number") && !v.is_null())
            .map(|(_, v)| text(v));
        if let (Some(number), Some(title)) = (number, first_field(value, &["title", "name"])) {
            return Some(FeatureEntry::Numbered {
                number,
                title: text(title),
                description: text_field(value, "description"),
            });
        }

        if let (Some(name), Some(description)) =
            (first_field(value, NAME_KEYS), text_field(value, "description"))
        {
            return Some(FeatureEntry::Named {
                name: text(name),
                description,
            });
        }

        None
    }

    /// Append this entry's lines to `block`
    pub fn render_into(&self, block: &mut MarkdownBlock, style: FeatureStyle) {
        match self {
            FeatureEntry::Pattern {
                name,
                description,
                use_cases,
                shortcomings,
            } => {
                block.blank();
                block.line(format!("#### {}", name));
                if let Some(description) = description {
                    block.line(format!("*   **Description:** {}", description));
                }
                push_sublist(block, "Use Cases", use_cases);
                push_sublist(block, "Shortcomings", shortcomings);
                block.blank();
            }
            FeatureEntry::Category { category, items } => {
                block.line(format!("*   **{}**", category));
                for item in items {
                    match item {
                        CategoryItem::Named { name, description } => {
                            block.line(format!("    *   {}: {}", name, description))
                        }
                        CategoryItem::Text(s) => block.line(format!("    *   {}", s)),
                    }
                }
            }
            FeatureEntry::Details { category, details } => {
                block.blank();
                block.line(format!("### {}", category));
                for detail in details {
                    block.line(format!("*   {}", detail));
                }
                block.blank();
            }
            FeatureEntry::Numbered {
                number,
                title,
                description,
            } => {
                block.blank();
                block.line(format!("**{}. {}**", number, title));
                if let Some(description) = description {
                    block.line(description.clone());
                }
                block.blank();
            }
            FeatureEntry::Named { name, description } => match style {
                FeatureStyle::Bullets => block.line(format!("*   **{}**: {}", name, description)),
                FeatureStyle::Paragraphs => {
                    block.blank();
                    block.line(format!("**{}**", name));
                    block.line(description.clone());
                    block.blank();
                }
            },
            FeatureEntry::Plain(s) => block.line(format!("*   {}", s)),
        }
    }
}

impl CategoryItem {
    fn classify(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => match (text_field(value, "name"), text_field(value, "description")) {
                (Some(name), Some(description)) => Some(CategoryItem::Named { name, description }),
                (Some(name), None) => Some(CategoryItem::Text(name)),
                _ => None,
            },
            Value::Array(_) | Value::Null => None,
            scalar => Some(CategoryItem::Text(text(scalar))),
        }
    }
}

fn texts(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(text)
        .filter(|s| !s.is_empty())
        .collect()
}

fn push_sublist(block: &mut MarkdownBlock, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    block.line(format!("*   **{}:**", label));
    for item in items {
        block.line(format!("    *   {}", item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(entry: &FeatureEntry, style: FeatureStyle) -> String {
        let mut block = MarkdownBlock::new();
        entry.render_into(&mut block, style);
        block.render()
    }

    #[test]
    fn test_classify_pattern() {
        let entry = FeatureEntry::classify(&json!({
            "pattern_name": "Event Sourcing",
            "description": "Store events.",
            "use_cases": ["Audit trails"],
        }))
        .unwrap();
        assert_eq!(
            entry,
            FeatureEntry::Pattern {
                name: "Event Sourcing".to_string(),
                description: Some("Store events.".to_string()),
                use_cases: vec!["Audit trails".to_string()],
                shortcomings: vec![],
            }
        );
        assert_eq!(
            render(&entry, FeatureStyle::Bullets),
            "#### Event Sourcing\n*   **Description:** Store events.\n*   **Use Cases:**\n    *   Audit trails\n\n"
        );
    }

    #[test]
    fn test_classify_category_with_capabilities() {
        let entry = FeatureEntry::classify(&json!({
            "category": "Payments",
            "capabilities": [{"name": "Refunds", "description": "Full and partial"}, "Payouts", 7, [1]],
        }))
        .unwrap();
        assert_eq!(
            render(&entry, FeatureStyle::Bullets),
            "*   **Payments**\n    *   Refunds: Full and partial\n    *   Payouts\n    *   7\n\n"
        );
    }

    #[test]
    fn test_classify_details_scalar_or_list() {
        let listed = FeatureEntry::classify(&json!({"category": "Filing", "details": ["Quarterly", "Annual"]}))
            .unwrap();
        assert_eq!(render(&listed, FeatureStyle::Bullets), "### Filing\n*   Quarterly\n*   Annual\n\n");

        let single = FeatureEntry::classify(&json!({"category": "Nexus", "details": "Economic nexus rules"}))
            .unwrap();
        assert_eq!(
            single,
            FeatureEntry::Details {
                category: "Nexus".to_string(),
                details: vec!["Economic nexus rules".to_string()],
            }
        );
    }

    #[test]
    fn test_classify_numbered() {
        let entry = FeatureEntry::classify(&json!({
            "requirement_number": 1,
            "title": "Install and maintain network security controls",
            "description": "Firewalls.",
        }))
        .unwrap();
        assert_eq!(
            render(&entry, FeatureStyle::Bullets),
            "**1. Install and maintain network security controls**\nFirewalls.\n\n"
        );

        let tip = FeatureEntry::classify(&json!({"tip_number": 3, "name": "Be clear", "description": "d"})).unwrap();
        assert!(matches!(tip, FeatureEntry::Numbered { title, .. } if title == "Be clear"));
    }

    #[test]
    fn test_named_styles() {
        let entry = FeatureEntry::classify(&json!({"name": "X", "description": "Y"})).unwrap();
        assert_eq!(render(&entry, FeatureStyle::Bullets), "*   **X**: Y\n\n");
        assert_eq!(render(&entry, FeatureStyle::Paragraphs), "**X**\nY\n\n");

        let trend = FeatureEntry::classify(&json!({"trend_name": "AI", "description": "Assistants"})).unwrap();
        assert_eq!(
            trend,
            FeatureEntry::Named {
                name: "AI".to_string(),
                description: "Assistants".to_string(),
            }
        );
    }

    #[test]
    fn test_plain_scalar() {
        let entry = FeatureEntry::classify(&json!("Webhooks")).unwrap();
        assert_eq!(render(&entry, FeatureStyle::Bullets), "*   Webhooks\n\n");
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(FeatureEntry::classify(&json!({"name": "No description"})).is_none());
        assert!(FeatureEntry::classify(&json!({"category": "Lonely"})).is_none());
        assert!(FeatureEntry::classify(&json!({"unrelated": true})).is_none());
        assert!(FeatureEntry::classify(&json!(null)).is_none());
        assert!(FeatureEntry::classify(&json!("")).is_none());
        assert!(FeatureEntry::classify(&json!([1, 2])).is_none());
    }
}
