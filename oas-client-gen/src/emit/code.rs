//! Indentation-aware text assembly.

use super::options::EmitOptions;

/// Lines of generated code, each tagged with its indentation depth.
///
/// Builders push lines at logical depths; indentation and line endings are
/// applied once in [`CodeBuffer::finish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    lines: Vec<(usize, String)>,
    depth: usize,
}

impl CodeBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a line at the current depth.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push((self.depth, text.into()));
        self
    }

    /// Push an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.lines.push((0, String::new()));
        self
    }

    /// Push `open` and increase the depth.
    pub fn open(&mut self, text: impl Into<String>) -> &mut Self {
        self.line(text);
        self.depth += 1;
        self
    }

    /// Decrease the depth and push `close`.
    pub fn close(&mut self, text: impl Into<String>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    /// Whether nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the buffer. Every line, the last included, ends with a line
    /// ending.
    pub fn finish(&self, options: &EmitOptions) -> String {
        let newline = options.line_ending.as_str();
        let mut out = String::new();
        for (depth, text) in &self.lines {
            if !text.is_empty() {
                out.push_str(&options.indent.indent(*depth));
                out.push_str(text);
            }
            out.push_str(newline);
        }
        out
    }
}
