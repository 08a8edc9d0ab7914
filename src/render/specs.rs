// Specification sub-shapes
//
// Rendering of the nested `specifications` object. Each shape reads one key
// (or, for outlines, all of them) and produces at most one block.

use super::block::MarkdownBlock;
use super::policy::{FieldFormat, FieldSpec, SpecShape};
use crate::record::{display_name, field, is_truthy, list_field, text, text_field};
use serde_json::Value;

/// Render one sub-shape of `specs`, or `None` when it has nothing to show
pub fn render_shape(shape: &SpecShape, specs: &Value) -> Option<MarkdownBlock> {
    let block = match shape {
        SpecShape::NamedItems {
            key,
            heading,
            title_case_names,
            fields,
        } => named_items(field(specs, key)?, heading.as_deref(), *title_case_names, fields),
        SpecShape::LabeledMap {
            key,
            heading,
            field: label_field,
        } => labeled_map(field(specs, key)?, heading.as_deref(), label_field),
        SpecShape::PropertyList { key, heading } => {
            property_list(list_field(specs, key), heading.as_deref())
        }
        SpecShape::Outline => outline(specs),
    };
    (!block.is_empty()).then_some(block)
}

fn start(heading: Option<&str>) -> MarkdownBlock {
    match heading {
        Some(heading) => MarkdownBlock::heading(3, heading),
        None => MarkdownBlock::new(),
    }
}

fn named_items(
    items: &Value,
    heading: Option<&str>,
    title_case_names: bool,
    fields: &[FieldSpec],
) -> MarkdownBlock {
    let Value::Object(items) = items else {
        return MarkdownBlock::new();
    };

    let mut block = start(heading);
    let mut rendered = false;
    for (name, details) in items {
        if !details.is_object() {
            continue;
        }
        let name = if title_case_names {
            display_name(name)
        } else {
            name.clone()
        };
        block.line(format!("#### {}", name));
        for spec in fields {
            push_field(&mut block, details, spec);
        }
        block.blank();
        rendered = true;
    }

    if rendered {
        block
    } else {
        MarkdownBlock::new()
    }
}

fn push_field(block: &mut MarkdownBlock, details: &Value, spec: &FieldSpec) {
    let Some(value) = field(details, &spec.key) else {
        return;
    };

    match spec.format {
        FieldFormat::Text => block.line(format!("*   **{}:** {}", spec.label, text(value))),
        FieldFormat::Join => {
            let joined = match value {
                Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(", "),
                other => text(other),
            };
            block.line(format!("*   **{}:** {}", spec.label, joined));
        }
        FieldFormat::List | FieldFormat::Relationships => {
            let entries: Vec<String> = match value {
                Value::Array(items) => items
                    .iter()
                    .filter(|item| is_truthy(item))
                    .map(|item| match spec.format {
                        FieldFormat::Relationships => relationship(item),
                        _ => text(item),
                    })
                    .collect(),
                other => vec![text(other)],
            };
            block.line(format!("*   **{}:**", spec.label));
            for entry in entries {
                block.line(format!("    *   {}", entry));
            }
        }
    }
}

/// `{ "type": "has many", "entity": "Invoice" }` -> `has many Invoice`
fn relationship(item: &Value) -> String {
    match (text_field(item, "type"), text_field(item, "entity")) {
        (Some(kind), Some(entity)) => format!("{} {}", kind, entity),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => text(item),
    }
}

fn labeled_map(items: &Value, heading: Option<&str>, label_field: &str) -> MarkdownBlock {
    let Value::Object(items) = items else {
        return MarkdownBlock::new();
    };

    let mut block = start(heading);
    let mut rendered = false;
    for (name, details) in items {
        let value = match details {
            Value::Object(_) => text_field(details, label_field),
            other if is_truthy(other) => Some(text(other)),
            _ => None,
        };
        if let Some(value) = value {
            block.line(format!("*   **{}:** {}", display_name(name), value));
            rendered = true;
        }
    }

    if rendered {
        block
    } else {
        MarkdownBlock::new()
    }
}

fn property_list(props: &[Value], heading: Option<&str>) -> MarkdownBlock {
    let mut block = start(heading);
    let mut rendered = false;
    for prop in props {
        let Some(name) = text_field(prop, "property") else {
            continue;
        };
        let mut line = format!("*   **{}**", name);
        if let Some(expected) = text_field(prop, "expected_type") {
            line.push_str(&format!(" ({})", expected));
        }
        if let Some(description) = text_field(prop, "description") {
            line.push_str(&format!(": {}", description));
        }
        block.line(line);
        rendered = true;
    }

    if rendered {
        block
    } else {
        MarkdownBlock::new()
    }
}

/// Bold-labelled outline of every key, nested objects two levels deep
fn outline(specs: &Value) -> MarkdownBlock {
    let mut block = MarkdownBlock::new();
    let Value::Object(map) = specs else {
        return block;
    };

    for (key, value) in map {
        if !is_truthy(value) {
            continue;
        }
        let label = display_name(key);
        match value {
            Value::Object(children) => {
                block.line(format!("**{}:**", label));
                for (sub_key, sub_value) in children {
                    let sub_label = display_name(sub_key);
                    match sub_value {
                        Value::Object(leaves) => {
                            block.line(format!("*   **{}:**", sub_label));
                            for (leaf_key, leaf) in leaves {
                                block.line(format!(
                                    "    *   {}: {}",
                                    display_name(leaf_key),
                                    text(leaf)
                                ));
                            }
                        }
                        other => block.line(format!("*   {}: {}", sub_label, text(other))),
                    }
                }
            }
            other => block.line(format!("**{}:** {}", label, text(other))),
        }
    }
    block
}
