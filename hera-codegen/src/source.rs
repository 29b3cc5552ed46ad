//! Source text builder for generated TypeScript/TSX files
//!
//! Generators never splice pack strings into code directly: string literals
//! go through [`js_string`], JSX text through [`jsx_text`], and layout goes
//! through [`SourceBuilder`] so indentation stays consistent across files.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Marker line at the top of every generated source file.
pub const GENERATED_MARKER: &str = "@generated by hera-mvp - do not edit manually.";

// ── Generated file ───────────────────────────────────────────────────────────

/// Output category, used for reporting counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Page,
    Api,
    Seed,
    Test,
    Lib,
    Middleware,
}

impl FileKind {
    pub const ALL: [FileKind; 6] = [
        FileKind::Page,
        FileKind::Api,
        FileKind::Seed,
        FileKind::Test,
        FileKind::Lib,
        FileKind::Middleware,
    ];

    /// Plural label for summaries.
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Page => "pages",
            FileKind::Api => "apis",
            FileKind::Seed => "seeds",
            FileKind::Test => "tests",
            FileKind::Lib => "lib",
            FileKind::Middleware => "middleware",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One file produced by a generator, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub kind: FileKind,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, kind: FileKind, contents: String) -> Self {
        Self {
            path: path.into(),
            kind,
            contents,
        }
    }
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Indentation-aware line writer.
///
/// ```
/// use hera_codegen::source::SourceBuilder;
///
/// let mut b = SourceBuilder::new();
/// b.block("function f() {", "}", |b| {
///     b.line("return 1");
/// });
/// assert_eq!(b.finish(), "function f() {\n  return 1\n}\n");
/// ```
#[derive(Debug, Default)]
pub struct SourceBuilder {
    out: String,
    depth: usize,
}

impl SourceBuilder {
    const INDENT: &'static str = "  ";

    pub fn new() -> Self {
        Self::default()
    }

    /// Start a file with the generated-code marker and a source note.
    pub fn with_header(source_note: &str) -> Self {
        let mut b = Self::new();
        b.line(format!("// {GENERATED_MARKER}"));
        b.line(format!("// Source: {source_note}"));
        b.blank();
        b
    }

    /// Write one line at the current depth. An empty string writes a bare
    /// newline.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(Self::INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    /// Write several lines at the current depth.
    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for l in lines {
            self.line(l);
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Write `open`, the body one level deeper, then `close`.
    pub fn block(
        &mut self,
        open: impl AsRef<str>,
        close: impl AsRef<str>,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.line(open);
        self.indented(body);
        self.line(close)
    }

    /// Run `body` one level deeper.
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self
    }

    /// `import { a, b } from 'module'`.
    pub fn import(&mut self, names: &[&str], module: &str) -> &mut Self {
        self.line(format!(
            "import {{ {} }} from {}",
            names.join(", "),
            js_string(module)
        ))
    }

    pub fn finish(self) -> String {
        self.out
    }
}

// ── Escaping ─────────────────────────────────────────────────────────────────

/// Single-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Text safe to place between JSX tags.
pub fn jsx_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

/// Text safe inside a `//` line comment.
pub fn comment_text(s: &str) -> String {
    s.replace(['\n', '\r', '\u{2028}', '\u{2029}'], " ")
}

/// JSON value literal, usable as a TypeScript expression.
pub fn ts_json(value: &serde_json::Value) -> String {
    // serde_json output is valid JS except for U+2028/U+2029 inside strings.
    value
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_indent() {
        let mut b = SourceBuilder::new();
        b.block("a {", "}", |b| {
            b.line("x");
            b.block("b {", "}", |b| {
                b.line("y");
            });
            b.blank();
        });
        assert_eq!(b.finish(), "a {\n  x\n  b {\n    y\n  }\n\n}\n");
    }

    #[test]
    fn header_has_marker() {
        let out = SourceBuilder::with_header("dealer-ops app pack").finish();
        assert!(out.starts_with("// @generated by hera-mvp"));
        assert!(out.contains("// Source: dealer-ops app pack"));
    }

    #[test]
    fn import_quotes_module() {
        let mut b = SourceBuilder::new();
        b.import(&["useState", "useEffect"], "react");
        assert_eq!(b.finish(), "import { useState, useEffect } from 'react'\n");
    }

    #[test]
    fn js_string_escapes_quotes_and_newlines() {
        assert_eq!(js_string("O'Brien"), r"'O\'Brien'");
        assert_eq!(js_string("a\\b"), r"'a\\b'");
        assert_eq!(js_string("line\nbreak"), r"'line\nbreak'");
    }

    #[test]
    fn jsx_text_escapes_braces_and_tags() {
        assert_eq!(jsx_text("{x} <b>"), "&#123;x&#125; &lt;b&gt;");
    }

    #[test]
    fn ts_json_escapes_line_separators() {
        let v = serde_json::json!({ "s": "a\u{2028}b" });
        assert_eq!(ts_json(&v), r#"{"s":"a\u2028b"}"#);
    }

    #[test]
    fn file_kind_labels() {
        let labels: Vec<_> = FileKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["pages", "apis", "seeds", "tests", "lib", "middleware"]);
    }
}
