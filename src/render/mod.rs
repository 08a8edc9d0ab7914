// Section rendering
//
// Turns one source record into markdown blocks under a rendering policy.
// Blocks are evaluated in a fixed order: heading, summary, specifications,
// features, challenges. Anything absent or empty is skipped along with its
// heading. Record text is inserted verbatim, without markdown escaping.

pub mod block;
pub mod features;
pub mod policy;
pub mod specs;

pub use block::*;
pub use features::*;
pub use policy::*;

use crate::record::{field, is_truthy, list_field, text, text_field, Record};
use serde_json::Value;

const SUMMARY_KEY: &str = "extracted_information";
const SPECIFICATIONS_KEY: &str = "specifications";
const FEATURES_KEY: &str = "features";
const CHALLENGES_KEY: &str = "challenges";
const SOLUTIONS_KEY: &str = "solutions";

/// Render a record into blocks. `title` is the source's display name.
pub fn render_record(record: &Record, policy: &RenderingPolicy, title: &str) -> Vec<MarkdownBlock> {
    let mut blocks = Vec::new();

    let summary = record.field(SUMMARY_KEY).map(text);
    let wants_heading = match policy.heading {
        HeadingRule::Always => true,
        HeadingRule::WithSummary => summary.is_some(),
        HeadingRule::Never => false,
    };
    if wants_heading {
        blocks.push(MarkdownBlock::heading(policy.heading_level, title));
    }

    if let Some(summary) = summary {
        let paragraph = match &policy.summary_label {
            Some(label) => format!("**{}:** {}", label, summary),
            None => summary,
        };
        blocks.push(MarkdownBlock::paragraph(paragraph));
    }

    if let Some(spec_value) = record.field(SPECIFICATIONS_KEY) {
        blocks.extend(
            policy
                .specifications
                .iter()
                .filter_map(|shape| specs::render_shape(shape, spec_value)),
        );
    }

    if let Some(block) = render_features(&record.root, &policy.features) {
        blocks.push(block);
    }

    if let Some(block) = render_challenges(&record.root, &policy.challenges) {
        blocks.push(block);
    }

    blocks
}

/// Start a block with a section title in the given style
fn section(heading: Option<&str>, style: HeadingStyle) -> MarkdownBlock {
    let mut block = MarkdownBlock::new();
    if let Some(heading) = heading {
        match style {
            HeadingStyle::H2 => block.push_heading(2, heading),
            HeadingStyle::H3 => block.push_heading(3, heading),
            HeadingStyle::H4 => block.push_heading(4, heading),
            HeadingStyle::Label => {
                block.line(format!("**{}:**", heading));
                block.line("");
            }
        }
    }
    block
}

/// Feature list block; `None` when no entry has a recognized shape
pub fn render_features(root: &Value, section_policy: &FeatureSection) -> Option<MarkdownBlock> {
    let entries: Vec<FeatureEntry> = list_field(root, FEATURES_KEY)
        .iter()
        .filter_map(FeatureEntry::classify)
        .collect();
    if entries.is_empty() {
        return None;
    }

    let mut block = section(section_policy.heading.as_deref(), section_policy.heading_style);
    for entry in &entries {
        entry.render_into(&mut block, section_policy.style);
    }
    Some(block)
}

/// Challenge block, each challenge followed by its matching solution if any
pub fn render_challenges(root: &Value, section_policy: &ChallengeSection) -> Option<MarkdownBlock> {
    let challenges = list_field(root, CHALLENGES_KEY);
    let solutions = list_field(root, SOLUTIONS_KEY);

    let mut block = section(section_policy.heading.as_deref(), section_policy.heading_style);
    let mut rendered = false;
    for challenge in challenges {
        let (name, description) = match challenge {
            Value::Object(_) => (
                text_field(challenge, "challenge_name"),
                text_field(challenge, "description"),
            ),
            other if is_scalar_text(other) => (Some(text(other)), None),
            _ => (None, None),
        };

        match (&name, &description) {
            (Some(name), _) => {
                block.line(format!("*   **Challenge:** {}", name));
                if let Some(description) = &description {
                    block.line(format!("    *   **Description:** {}", description));
                }
            }
            (None, Some(description)) => block.line(format!("*   **Challenge:** {}", description)),
            (None, None) => continue,
        }
        rendered = true;

        if let Some(solution) = name.as_deref().and_then(|n| find_solution(solutions, n)) {
            block.line(format!("    *   **Solution:** {}", solution));
        }
    }

    rendered.then_some(block)
}

fn is_scalar_text(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_)) && is_truthy(value)
}

/// First solution whose `challenge_name` matches
fn find_solution(solutions: &[Value], challenge_name: &str) -> Option<String> {
    solutions
        .iter()
        .find(|s| text_field(s, "challenge_name").as_deref() == Some(challenge_name))
        .and_then(|s| {
            ["solution_description", "description", "solution"]
                .iter()
                .find_map(|key| field(s, key).map(text))
        })
}
