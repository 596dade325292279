//! Frontmatter parsing and writing.
//!
//! Handles the `---` delimited block at the top of a post:
//! ```markdown
//! ---
//! title: "My First Post!"
//! subtitle: ""
//! id: 1
//! date: "2025-02-10"
//! tags: ["go", "rust"]
//! prev: hello-world
//! next: hello-world
//! ---
//!
//! # My First Post!
//! ```
//!
//! The block is split into one segment per top-level key (plus verbatim
//! blank and comment lines). Every parsed segment keeps its exact source
//! text and is written back untouched unless its value is replaced through
//! [`Frontmatter::set`], so hand-authored keys, quoting and list layout
//! survive a rewrite. The body after the closing marker is never parsed.

use serde::{Deserialize, Serialize};

use crate::error::FrontmatterError;

/// The marker line opening and closing a frontmatter block.
pub const MARKER: &str = "---";

/// How sequences written by this crate are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    /// `tags: ["go", "rust"]`
    #[default]
    Inline,
    /// `tags:` followed by one `  - item` line per element.
    Block,
}

/// A decoded frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    List(Vec<String>),
    /// Anything else a document author wrote (booleans, floats, null,
    /// nested structures). Passed through untouched.
    Other(serde_yaml::Value),
}

impl FieldValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Field {
    key: String,
    value: FieldValue,
    /// Exact source lines; `None` once the value has been replaced.
    raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Field(Field),
    Verbatim(String),
}

/// The key/value mapping inside a frontmatter block, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    segments: Vec<Segment>,
}

impl Frontmatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the first field named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields().find(|f| f.key == key).map(|f| &f.value)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields().map(|f| f.key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set `key` to `value`.
    ///
    /// An existing key keeps its position; a new key goes after the last
    /// existing key. Setting a key to the value it already holds leaves its
    /// source text alone.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError::UnsupportedValue`] for strings containing
    /// a line break or the `---` marker.
    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<(), FrontmatterError> {
        let value = value.into();
        check_supported(key, &value)?;

        let existing = self.segments.iter_mut().find_map(|segment| match segment {
            Segment::Field(field) if field.key == key => Some(field),
            _ => None,
        });

        if let Some(field) = existing {
            if field.value != value {
                field.value = value;
                field.raw = None;
            }
            return Ok(());
        }

        let insert_at = self
            .segments
            .iter()
            .rposition(|s| matches!(s, Segment::Field(_)))
            .map_or(self.segments.len(), |i| i + 1);
        self.segments.insert(
            insert_at,
            Segment::Field(Field {
                key: key.to_string(),
                value,
                raw: None,
            }),
        );
        Ok(())
    }

    fn fields(&self) -> impl Iterator<Item = &Field> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(field) => Some(field),
            Segment::Verbatim(_) => None,
        })
    }

    fn parse_block(block: &str) -> Result<Self, FrontmatterError> {
        let mut segments = Vec::new();
        let mut current: Option<(String, String)> = None;
        // Blank and comment lines seen while a field is open. They belong to
        // that field if an indented line follows, otherwise they stand alone.
        let mut pending = String::new();

        for line in block.split_inclusive('\n') {
            let content = strip_line_ending(line);

            if content.trim().is_empty() || content.starts_with('#') {
                if current.is_some() {
                    pending.push_str(line);
                } else {
                    segments.push(Segment::Verbatim(line.to_string()));
                }
            } else if content.starts_with([' ', '\t']) || content == "-" || content.starts_with("- ")
            {
                match current.as_mut() {
                    Some((_, raw)) => {
                        raw.push_str(&pending);
                        pending.clear();
                        raw.push_str(line);
                    }
                    None => {
                        return Err(FrontmatterError::Invalid {
                            key: String::new(),
                            message: format!("continuation line without a key: {content:?}"),
                        })
                    }
                }
            } else {
                flush(&mut current, &mut segments)?;
                push_verbatim(&mut pending, &mut segments);
                let (key, _) = content.split_once(':').ok_or_else(|| FrontmatterError::Invalid {
                    key: content.to_string(),
                    message: "expected `key: value`".to_string(),
                })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(FrontmatterError::Invalid {
                        key: String::new(),
                        message: format!("empty key in line {content:?}"),
                    });
                }
                current = Some((key.to_string(), line.to_string()));
            }
        }
        flush(&mut current, &mut segments)?;
        push_verbatim(&mut pending, &mut segments);

        Ok(Self { segments })
    }

    fn write_block(
        &self,
        style: ListStyle,
        newline: &str,
        out: &mut String,
    ) -> Result<(), FrontmatterError> {
        for segment in &self.segments {
            match segment {
                Segment::Verbatim(line) => out.push_str(line),
                Segment::Field(Field { raw: Some(raw), .. }) => out.push_str(raw),
                Segment::Field(field) => write_field(&field.key, &field.value, style, newline, out)?,
            }
        }
        Ok(())
    }
}

/// A post file: frontmatter plus the untouched body after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub body: String,
    opening: String,
    closing: String,
    body_offset: Option<usize>,
}

impl Document {
    /// A new document with `\n`-terminated markers.
    #[must_use]
    pub fn new(frontmatter: Frontmatter, body: String) -> Self {
        Self {
            frontmatter,
            body,
            opening: format!("{MARKER}\n"),
            closing: format!("{MARKER}\n"),
            body_offset: None,
        }
    }

    /// Byte offset in the parsed source where the body began.
    /// `None` for documents built with [`Document::new`].
    #[must_use]
    pub fn body_offset(&self) -> Option<usize> {
        self.body_offset
    }
}

/// Split `text` into its frontmatter block and body.
///
/// # Errors
///
/// Returns [`FrontmatterError::NotFound`] if the first line is not the
/// `---` marker, [`FrontmatterError::Unterminated`] if no closing marker
/// follows, and [`FrontmatterError::Invalid`] if a field cannot be decoded.
pub fn parse(text: &str) -> Result<Document, FrontmatterError> {
    let block_start = line_end(text, 0);
    let opening = &text[..block_start];
    if strip_line_ending(opening) != MARKER {
        return Err(FrontmatterError::NotFound);
    }

    let mut pos = block_start;
    while pos < text.len() {
        let end = line_end(text, pos);
        let line = &text[pos..end];
        if strip_line_ending(line) == MARKER {
            let frontmatter = Frontmatter::parse_block(&text[block_start..pos])?;
            return Ok(Document {
                frontmatter,
                body: text[end..].to_string(),
                opening: opening.to_string(),
                closing: line.to_string(),
                body_offset: Some(end),
            });
        }
        pos = end;
    }

    Err(FrontmatterError::Unterminated)
}

/// Write `doc` back out as text.
///
/// Untouched fields are copied from their source; replaced or new fields
/// are written using `style` for sequences.
///
/// # Errors
///
/// Returns [`FrontmatterError::UnsupportedValue`] if a value cannot be
/// written as a single frontmatter line.
pub fn serialize(doc: &Document, style: ListStyle) -> Result<String, FrontmatterError> {
    let newline = if doc.opening.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    let mut output = String::with_capacity(doc.body.len() + 256);
    output.push_str(&doc.opening);
    doc.frontmatter.write_block(style, newline, &mut output)?;
    output.push_str(&doc.closing);
    output.push_str(&doc.body);
    Ok(output)
}

fn line_end(text: &str, start: usize) -> usize {
    text[start..]
        .find('\n')
        .map_or(text.len(), |i| start + i + 1)
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn push_verbatim(pending: &mut String, segments: &mut Vec<Segment>) {
    for line in pending.split_inclusive('\n') {
        segments.push(Segment::Verbatim(line.to_string()));
    }
    pending.clear();
}

fn flush(
    current: &mut Option<(String, String)>,
    segments: &mut Vec<Segment>,
) -> Result<(), FrontmatterError> {
    let Some((key, raw)) = current.take() else {
        return Ok(());
    };

    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(&raw).map_err(|e| FrontmatterError::Invalid {
            key: key.clone(),
            message: e.to_string(),
        })?;
    let (parsed_key, value) = mapping
        .into_iter()
        .next()
        .ok_or_else(|| FrontmatterError::Invalid {
            key: key.clone(),
            message: "no value found".to_string(),
        })?;

    // Prefer the decoded key so `"title": x` reads as `title`.
    let key = match parsed_key {
        serde_yaml::Value::String(decoded) => decoded,
        _ => key,
    };

    segments.push(Segment::Field(Field {
        key,
        value: decode(value),
        raw: Some(raw),
    }));
    Ok(())
}

fn decode(value: serde_yaml::Value) -> FieldValue {
    match value {
        serde_yaml::Value::String(s) => FieldValue::Text(s),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Other(serde_yaml::Value::Number(n)),
        },
        serde_yaml::Value::Sequence(items) if items.iter().all(serde_yaml::Value::is_string) => {
            FieldValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_yaml::Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )
        }
        other => FieldValue::Other(other),
    }
}

fn check_supported(key: &str, value: &FieldValue) -> Result<(), FrontmatterError> {
    let check = |s: &str| {
        if s.contains(['\n', '\r']) {
            Err(FrontmatterError::UnsupportedValue {
                key: key.to_string(),
                reason: "line breaks are not supported".to_string(),
            })
        } else if s.contains(MARKER) {
            Err(FrontmatterError::UnsupportedValue {
                key: key.to_string(),
                reason: format!("values may not contain the '{MARKER}' marker"),
            })
        } else {
            Ok(())
        }
    };

    match value {
        FieldValue::Text(s) => check(s.as_str()),
        FieldValue::List(items) => items.iter().try_for_each(|item| check(item.as_str())),
        FieldValue::Integer(_) | FieldValue::Other(_) => Ok(()),
    }
}

fn write_field(
    key: &str,
    value: &FieldValue,
    style: ListStyle,
    newline: &str,
    out: &mut String,
) -> Result<(), FrontmatterError> {
    out.push_str(key);
    out.push(':');
    match value {
        FieldValue::Text(s) => {
            out.push(' ');
            out.push_str(&format_scalar(s));
        }
        FieldValue::Integer(i) => {
            out.push(' ');
            out.push_str(&i.to_string());
        }
        FieldValue::List(items) if items.is_empty() => out.push_str(" []"),
        FieldValue::List(items) => match style {
            ListStyle::Inline => {
                let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
                out.push_str(" [");
                out.push_str(&quoted.join(", "));
                out.push(']');
            }
            ListStyle::Block => {
                for item in items {
                    out.push_str(newline);
                    out.push_str("  - ");
                    out.push_str(&format_scalar(item));
                }
            }
        },
        FieldValue::Other(other) => {
            let text = serde_yaml::to_string(other).map_err(|e| FrontmatterError::Invalid {
                key: key.to_string(),
                message: e.to_string(),
            })?;
            let text = text.trim_end_matches('\n');
            if text.contains('\n') {
                return Err(FrontmatterError::UnsupportedValue {
                    key: key.to_string(),
                    reason: "nested values cannot be written".to_string(),
                });
            }
            out.push(' ');
            out.push_str(text);
        }
    }
    out.push_str(newline);
    Ok(())
}

/// Plain when the text reads back as the same string under both YAML 1.2
/// (serde_yaml) and YAML 1.1 implicit typing, double-quoted otherwise.
fn format_scalar(s: &str) -> String {
    let plain_chars = !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.' | '/' | '!' | '?'));
    let reads_back = || {
        matches!(
            serde_yaml::from_str::<serde_yaml::Value>(s),
            Ok(serde_yaml::Value::String(ref decoded)) if decoded == s
        )
    };

    if plain_chars && s.trim() == s && !yaml11_implicit(s) && reads_back() {
        s.to_string()
    } else {
        quote(s)
    }
}

/// Plain scalars a YAML 1.1 reader (js-yaml, PyYAML) would not load as a
/// string: booleans, timestamps and numbers with 1.1-only spellings.
fn yaml11_implicit(s: &str) -> bool {
    const WORDS: &[&str] = &["y", "yes", "n", "no", "true", "false", "on", "off", "null", "~"];
    if WORDS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        return true;
    }
    if is_timestamp(s) {
        return true;
    }

    let unsigned = s.trim_start_matches(['+', '-']);
    let numeric = unsigned.replace('_', "");
    unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && (numeric.parse::<f64>().is_ok()
            || numeric.starts_with("0b")
            || numeric.starts_with("0x")
            || numeric.starts_with("0o"))
}

/// `YYYY-M-D`, optionally followed by a time part.
fn is_timestamp(s: &str) -> bool {
    let mut parts = s.splitn(3, '-');
    let (Some(year), Some(month), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let day_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };

    digits(year, 4, 4)
        && digits(month, 1, 2)
        && (1..=2).contains(&day_len)
        && matches!(rest[day_len..].chars().next(), None | Some('T' | 't' | ' '))
}

/// JSON string syntax is valid YAML double-quoted scalar syntax.
fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POST: &str = r#"---
title: "Hello, World"
subtitle: ""
id: 3
date: "2025-02-10"
tag:
  - go
  - rust
# hand-written note
draft: false
---

# Hello, World

Body text with --- inside and a trailing line.
"#;

    #[test]
    fn parse_extracts_fields_and_body() {
        let doc = parse(POST).unwrap();
        let fm = &doc.frontmatter;

        assert_eq!(fm.get_str("title"), Some("Hello, World"));
        assert_eq!(fm.get_str("subtitle"), Some(""));
        assert_eq!(fm.get("id").and_then(FieldValue::as_i64), Some(3));
        assert_eq!(fm.get_str("date"), Some("2025-02-10"));
        assert_eq!(
            fm.get("tag").and_then(FieldValue::as_list),
            Some(&["go".to_string(), "rust".to_string()][..])
        );
        assert_eq!(
            fm.get("draft"),
            Some(&FieldValue::Other(serde_yaml::Value::Bool(false)))
        );
        assert_eq!(
            fm.keys().collect::<Vec<_>>(),
            ["title", "subtitle", "id", "date", "tag", "draft"]
        );
        assert!(doc.body.starts_with("\n# Hello, World\n"));
        assert!(doc.body.contains("--- inside"));
    }

    #[test]
    fn body_offset_marks_the_body_start() {
        let doc = parse(POST).unwrap();
        let offset = doc.body_offset().unwrap();
        assert_eq!(&POST[offset..], doc.body);
        assert!(POST[..offset].ends_with("---\n"));
    }

    #[test]
    fn parse_reads_inline_lists_and_plain_scalars() {
        let text = "---\ntags: [\"go\", rust]\ndate: 2025-02-10\nprev: a\n---\nbody";
        let doc = parse(text).unwrap();
        assert_eq!(
            doc.frontmatter.get("tags"),
            Some(&FieldValue::List(vec!["go".into(), "rust".into()]))
        );
        assert_eq!(doc.frontmatter.get_str("date"), Some("2025-02-10"));
        assert_eq!(doc.frontmatter.get_str("prev"), Some("a"));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn parse_rejects_missing_opener() {
        assert_eq!(
            parse("title: x\n---\n").unwrap_err(),
            FrontmatterError::NotFound
        );
        assert_eq!(
            parse("\n---\ntitle: x\n---\n").unwrap_err(),
            FrontmatterError::NotFound
        );
        assert_eq!(parse("").unwrap_err(), FrontmatterError::NotFound);
    }

    #[test]
    fn parse_rejects_missing_closer() {
        assert_eq!(
            parse("---\ntitle: x\n").unwrap_err(),
            FrontmatterError::Unterminated
        );
        assert_eq!(parse("---").unwrap_err(), FrontmatterError::Unterminated);
    }

    #[test]
    fn parse_rejects_lines_without_keys() {
        let err = parse("---\njust some words\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Invalid { .. }));

        let err = parse("---\n  - orphan\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Invalid { .. }));
    }

    #[test]
    fn untouched_document_roundtrips_exactly() {
        let doc = parse(POST).unwrap();
        assert_eq!(serialize(&doc, ListStyle::Inline).unwrap(), POST);
        assert_eq!(serialize(&doc, ListStyle::Block).unwrap(), POST);
    }

    #[test]
    fn crlf_document_roundtrips_exactly() {
        let text = "---\r\ntitle: A\r\ntags:\r\n  - x\r\n---\r\nBody\r\n";
        let doc = parse(text).unwrap();
        assert_eq!(serialize(&doc, ListStyle::Inline).unwrap(), text);
    }

    #[test]
    fn crlf_document_gets_crlf_for_new_keys() {
        let text = "---\r\ntitle: A\r\n---\r\nBody\r\n";
        let mut doc = parse(text).unwrap();
        doc.frontmatter.set("prev", "b").unwrap();
        assert_eq!(
            serialize(&doc, ListStyle::Inline).unwrap(),
            "---\r\ntitle: A\r\nprev: b\r\n---\r\nBody\r\n"
        );
    }

    #[test]
    fn set_appends_new_keys_and_keeps_everything_else() {
        let mut doc = parse(POST).unwrap();
        doc.frontmatter.set("prev", "b").unwrap();
        doc.frontmatter.set("next", "c").unwrap();

        let out = serialize(&doc, ListStyle::Inline).unwrap();
        let expected = POST.replace("draft: false\n", "draft: false\nprev: b\nnext: c\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn set_replaces_existing_value_in_place() {
        let text = "---\nprev: old\ntitle: T\nnext: old\n---\nbody\n";
        let mut doc = parse(text).unwrap();
        doc.frontmatter.set("prev", "a").unwrap();
        doc.frontmatter.set("next", "b").unwrap();
        assert_eq!(
            serialize(&doc, ListStyle::Inline).unwrap(),
            "---\nprev: a\ntitle: T\nnext: b\n---\nbody\n"
        );
    }

    #[test]
    fn set_with_same_value_keeps_source_text() {
        let text = "---\nprev: \"a\"\n---\n";
        let mut doc = parse(text).unwrap();
        doc.frontmatter.set("prev", "a").unwrap();
        assert_eq!(serialize(&doc, ListStyle::Inline).unwrap(), text);
    }

    #[test]
    fn new_keys_go_before_trailing_blank_lines() {
        let text = "---\ntitle: T\n\n---\nbody";
        let mut doc = parse(text).unwrap();
        doc.frontmatter.set("next", "x").unwrap();
        assert_eq!(
            serialize(&doc, ListStyle::Inline).unwrap(),
            "---\ntitle: T\nnext: x\n\n---\nbody"
        );
    }

    #[test]
    fn lists_follow_the_requested_style() {
        let mut fm = Frontmatter::new();
        fm.set("tags", vec!["go".to_string(), "rust".to_string()])
            .unwrap();
        fm.set("empty", Vec::<String>::new()).unwrap();
        let doc = Document::new(fm, String::new());

        assert_eq!(
            serialize(&doc, ListStyle::Inline).unwrap(),
            "---\ntags: [\"go\", \"rust\"]\nempty: []\n---\n"
        );
        assert_eq!(
            serialize(&doc, ListStyle::Block).unwrap(),
            "---\ntags:\n  - go\n  - rust\nempty: []\n---\n"
        );
    }

    #[test]
    fn scalars_are_quoted_only_when_needed() {
        let mut fm = Frontmatter::new();
        fm.set("title", "My First Post!").unwrap();
        fm.set("subtitle", "").unwrap();
        fm.set("number", "42").unwrap();
        fm.set("flag", "true").unwrap();
        fm.set("colon", "Rust: an intro").unwrap();
        fm.set("id", 7_i64).unwrap();
        let out = serialize(&Document::new(fm, String::new()), ListStyle::Inline).unwrap();

        assert!(out.contains("title: My First Post!\n"));
        assert!(out.contains("subtitle: \"\"\n"));
        assert!(out.contains("number: \"42\"\n"));
        assert!(out.contains("flag: \"true\"\n"));
        assert!(out.contains("colon: \"Rust: an intro\"\n"));
        assert!(out.contains("id: 7\n"));

        let back = parse(&out).unwrap();
        assert_eq!(back.frontmatter.get_str("number"), Some("42"));
        assert_eq!(back.frontmatter.get_str("colon"), Some("Rust: an intro"));
        assert_eq!(back.frontmatter.get_str("subtitle"), Some(""));
    }

    #[test]
    fn yaml11_implicit_scalars_are_quoted() {
        let mut fm = Frontmatter::new();
        fm.set("date", "2025-02-10").unwrap();
        fm.set("stamp", "2025-2-3T10:00").unwrap();
        fm.set("answer", "yes").unwrap();
        fm.set("toggle", "On").unwrap();
        fm.set("short", "n").unwrap();
        fm.set("big", "1_000").unwrap();
        fm.set("hex", "0x1F").unwrap();
        fm.set("year", "1984").unwrap();
        fm.set("plain", "2025 recap").unwrap();
        fm.set("word", "online").unwrap();
        let out = serialize(&Document::new(fm, String::new()), ListStyle::Inline).unwrap();

        assert!(out.contains("date: \"2025-02-10\"\n"));
        assert!(out.contains("stamp: \"2025-2-3T10:00\"\n"));
        assert!(out.contains("answer: \"yes\"\n"));
        assert!(out.contains("toggle: \"On\"\n"));
        assert!(out.contains("short: \"n\"\n"));
        assert!(out.contains("big: \"1_000\"\n"));
        assert!(out.contains("hex: \"0x1F\"\n"));
        assert!(out.contains("year: \"1984\"\n"));
        assert!(out.contains("plain: 2025 recap\n"));
        assert!(out.contains("word: online\n"));

        let back = parse(&out).unwrap();
        assert_eq!(back.frontmatter.get_str("date"), Some("2025-02-10"));
        assert_eq!(back.frontmatter.get_str("toggle"), Some("On"));
    }

    #[test]
    fn literal_block_with_blank_lines_is_one_field() {
        let text = "---\ntitle: T\ndescription: |\n  para one\n\n  para two\nid: 2\n---\nbody\n";
        let mut doc = parse(text).unwrap();
        assert_eq!(
            doc.frontmatter.get_str("description"),
            Some("para one\n\npara two\n")
        );
        assert_eq!(doc.frontmatter.get("id"), Some(&FieldValue::Integer(2)));
        assert_eq!(serialize(&doc, ListStyle::Inline).unwrap(), text);

        doc.frontmatter.set("next", "b").unwrap();
        assert_eq!(
            serialize(&doc, ListStyle::Inline).unwrap(),
            text.replace("id: 2\n", "id: 2\nnext: b\n")
        );
    }

    #[test]
    fn comment_between_list_items_stays_in_the_list() {
        let text = "---\ntags:\n  - a\n# later\n  - b\n\ntitle: T\n---\n";
        let doc = parse(text).unwrap();
        assert_eq!(
            doc.frontmatter.get("tags"),
            Some(&FieldValue::List(vec!["a".to_string(), "b".to_string()]))
        );
        assert_eq!(doc.frontmatter.get_str("title"), Some("T"));
        assert_eq!(serialize(&doc, ListStyle::Inline).unwrap(), text);
    }

    #[test]
    fn blank_line_after_last_field_stays_outside_it() {
        let text = "---\ntitle: T\n\n# note\n---\n";
        let mut doc = parse(text).unwrap();
        doc.frontmatter.set("title", "U").unwrap();
        assert_eq!(
            serialize(&doc, ListStyle::Inline).unwrap(),
            "---\ntitle: U\n\n# note\n---\n"
        );
    }

    #[test]
    fn unsupported_values_fail_loudly() {
        let mut fm = Frontmatter::new();
        let err = fm.set("title", "a\nb").unwrap_err();
        assert!(matches!(err, FrontmatterError::UnsupportedValue { .. }));

        let err = fm.set("title", "before --- after").unwrap_err();
        assert!(matches!(err, FrontmatterError::UnsupportedValue { .. }));

        let err = fm
            .set("tags", vec!["ok".to_string(), "---".to_string()])
            .unwrap_err();
        assert!(matches!(err, FrontmatterError::UnsupportedValue { .. }));
        assert!(fm.is_empty());
    }

    fn document_strategy() -> impl Strategy<Value = String> {
        let value = prop_oneof![
            "[a-zA-Z0-9 ]{0,12}",
            "[0-9]{1,6}",
            prop::collection::vec("[a-z0-9]{1,6}", 0..4)
                .prop_map(|items| format!("[{}]", items.join(", "))),
        ];
        (
            prop::collection::btree_map("[a-z][a-z_]{0,8}", value, 0..6),
            "\\PC{0,60}",
        )
            .prop_map(|(fields, body)| {
                let mut text = String::from("---\n");
                for (key, value) in fields {
                    text.push_str(&format!("{key}: {value}\n"));
                }
                text.push_str("---\n");
                text.push_str(&body);
                text
            })
    }

    proptest! {
        #[test]
        fn serialize_after_parse_is_identity(text in document_strategy()) {
            let doc = parse(&text).unwrap();
            prop_assert_eq!(serialize(&doc, ListStyle::Inline).unwrap(), text);
        }
    }
}
