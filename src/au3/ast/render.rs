//! Canonical source rendering
//!
//! Collects rendered lines with the current nesting depth applied. Nested bodies are
//! indented by four spaces; verbatim lines (comment-block interiors) are written as is.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
    lines: Vec<String>,
    depth: usize,
}

impl SourceWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current depth. Empty lines carry no indentation.
    pub(crate) fn line(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.lines.push(text);
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(self.depth), text));
        }
    }

    pub(crate) fn verbatim(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    pub(crate) fn indented<F: FnOnce(&mut Self)>(&mut self, write: F) {
        self.depth += 1;
        write(self);
        self.depth -= 1;
    }

    /// Index the next written line will get.
    pub(crate) fn mark(&self) -> usize {
        self.lines.len()
    }

    /// Attach a trailing comment to an already written line.
    pub(crate) fn annotate(&mut self, idx: usize, comment: &str) {
        if comment.is_empty() {
            return;
        }
        let indent = INDENT.repeat(self.depth);
        if let Some(line) = self.lines.get_mut(idx) {
            if line.is_empty() {
                *line = format!("{indent}; {comment}");
            } else {
                line.push_str(" ; ");
                line.push_str(comment);
            }
        }
    }

    pub(crate) fn finish(self) -> String {
        self.lines.join("\n")
    }
}
