//! Indent-aware string builder for tool XML and command text.
//!
//! Galaxy tool XML uses 4-space indentation.

const DEFAULT_INDENT: &str = "    ";

/// Indent-aware string builder that produces formatted markup.
pub struct CodeWriter {
    buf: String,
    indent_level: usize,
    unit: &'static str,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    pub fn with_indent(unit: &'static str) -> Self {
        Self {
            buf: String::with_capacity(1024),
            indent_level: 0,
            unit,
        }
    }

    /// Write a complete line (appends newline).
    pub fn line(&mut self, text: &str) {
        self.write_indent();
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write each line of `text` at the current indent; blank lines stay empty.
    pub fn lines(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.blank();
            } else {
                self.line(line);
            }
        }
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Increase indent by one level.
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent by one level.
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write an opening tag line and increase indent (e.g. `<inputs>`).
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.indent();
    }

    /// Decrease indent and write the closing tag line.
    pub fn close(&mut self, text: &str) {
        self.dedent();
        self.line(text);
    }

    /// Consume the writer and return the generated string.
    pub fn finish(self) -> String {
        self.buf
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buf.push_str(self.unit);
        }
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
