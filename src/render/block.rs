// Markdown blocks
//
// A block is an ordered run of lines. Rendering a block always ends it with
// exactly one blank line, so blocks can be concatenated without ever running
// two headings together.

/// An ordered sequence of markdown lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownBlock {
    lines: Vec<String>,
}

impl MarkdownBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A block holding a single ATX heading
    pub fn heading(level: usize, text: &str) -> Self {
        let mut block = Self::new();
        block.push_heading(level, text);
        block
    }

    /// A block holding a single paragraph
    pub fn paragraph(text: impl Into<String>) -> Self {
        let mut block = Self::new();
        block.line(text);
        block
    }

    /// Append a heading followed by a blank line
    pub fn push_heading(&mut self, level: usize, text: &str) {
        self.blank();
        self.line(heading_line(level, text));
        self.lines.push(String::new());
    }

    /// Append a line verbatim apart from trailing line breaks, which would
    /// otherwise add blank lines after the block. An empty line acts as `blank`.
    pub fn line(&mut self, line: impl Into<String>) {
        let mut line = line.into();
        let end = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(end);
        if line.is_empty() {
            self.blank();
        } else {
            self.lines.push(line);
        }
    }

    /// Append a blank line unless the block is empty or already ends with one
    pub fn blank(&mut self) {
        if matches!(self.lines.last(), Some(last) if !last.is_empty()) {
            self.lines.push(String::new());
        }
    }

    /// Whether the block has any non-blank content
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render to text ending in exactly one blank line. Empty blocks render to nothing.
    pub fn render(&self) -> String {
        let start = self.lines.iter().position(|l| !l.is_empty());
        let end = self.lines.iter().rposition(|l| !l.is_empty());
        match (start, end) {
            (Some(start), Some(end)) => {
                let mut out = self.lines[start..=end].join("\n");
                out.push_str("\n\n");
                out
            }
            _ => String::new(),
        }
    }
}

/// Format an ATX heading line
pub fn heading_line(level: usize, text: &str) -> String {
    format!("{} {}", "#".repeat(level.clamp(1, 6)), text)
}

/// Concatenate rendered blocks in order
pub fn render_blocks(blocks: &[MarkdownBlock]) -> String {
    blocks.iter().map(MarkdownBlock::render).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_block() {
        assert_eq!(MarkdownBlock::heading(2, "Stripe").render(), "## Stripe\n\n");
    }

    #[test]
    fn test_render_trims_to_single_blank_line() {
        let mut block = MarkdownBlock::new();
        block.line("");
        block.line("text");
        block.line("");
        block.line("");
        assert_eq!(block.render(), "text\n\n");
    }

    #[test]
    fn test_trailing_line_breaks_are_stripped() {
        let mut block = MarkdownBlock::new();
        block.line("Alpha.\n");
        block.line("first\nsecond\r\n");
        assert_eq!(block.lines(), ["Alpha.", "first\nsecond"]);
        assert_eq!(block.render(), "Alpha.\nfirst\nsecond\n\n");
    }

    #[test]
    fn test_line_of_only_breaks_is_a_blank() {
        let mut block = MarkdownBlock::new();
        block.line("a");
        block.line("\n\n");
        block.line("");
        block.line("b");
        assert_eq!(block.lines(), ["a", "", "b"]);
    }

    #[test]
    fn test_blank_does_not_stack() {
        let mut block = MarkdownBlock::new();
        block.blank();
        block.line("a");
        block.blank();
        block.blank();
        block.line("b");
        assert_eq!(block.lines(), ["a", "", "b"]);
    }

    #[test]
    fn test_empty_block_renders_nothing() {
        let mut block = MarkdownBlock::new();
        block.blank();
        assert!(block.is_empty());
        assert_eq!(block.render(), "");
    }

    #[test]
    fn test_concatenation_never_joins_headings() {
        let blocks = vec![
            MarkdownBlock::heading(2, "One"),
            MarkdownBlock::heading(3, "Two"),
            MarkdownBlock::paragraph("body"),
        ];
        assert_eq!(render_blocks(&blocks), "## One\n\n### Two\n\nbody\n\n");
    }

    #[test]
    fn test_heading_level_is_clamped() {
        assert_eq!(heading_line(0, "x"), "# x");
        assert_eq!(heading_line(9, "x"), "###### x");
    }
}
