//! README template parsing and rendering.
//!
//! Templates use the `{{.Field}}` action syntax. Two fields exist:
//! `ImageURL` and `BuildTimestamp`. `{{/* ... */}}` is a comment, and
//! `{{- ` / ` -}}` trim the whitespace next to an action as Go does.

use std::path::Path;

use chrono::{Local, SecondsFormat};

use crate::error::ReadmeError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const TRIM: char = '-';
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

/// Values substituted into the template.
#[derive(Debug, Clone)]
pub struct TemplateData<'a> {
    /// Data URI or relative image path.
    pub image_url: &'a str,
    /// RFC 3339 build time.
    pub build_timestamp: &'a str,
}

impl TemplateData<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "ImageURL" => Some(self.image_url),
            "BuildTimestamp" => Some(self.build_timestamp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field { name: String, line: usize },
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeError::TemplateParse`] for unclosed, empty or
    /// non-field actions.
    pub fn parse(source: &str) -> Result<Self, ReadmeError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut line = 1;
        let mut trim_next = false;

        while let Some(start) = rest.find(OPEN) {
            let (text, tail) = rest.split_at(start);
            line += text.matches('\n').count();

            let tail = &tail[OPEN.len()..];
            let (tail, trim_left) = match tail.strip_prefix(TRIM) {
                Some(after) if after.starts_with(char::is_whitespace) => (after, true),
                _ => (tail, false),
            };
            push_text(&mut segments, text, trim_next, trim_left);

            let is_comment = tail.trim_start().starts_with(COMMENT_OPEN);
            let end = if is_comment {
                comment_end(tail).ok_or_else(|| {
                    ReadmeError::TemplateParse(format!("line {line}: unclosed comment"))
                })?
            } else {
                tail.find(CLOSE).ok_or_else(|| {
                    ReadmeError::TemplateParse(format!("line {line}: unclosed action"))
                })?
            };
            let (action, trim_right) = match tail[..end].strip_suffix(TRIM) {
                Some(before) if before.ends_with(char::is_whitespace) => (before.trim(), true),
                _ => (tail[..end].trim(), false),
            };

            if !is_comment {
                if action.is_empty() {
                    return Err(ReadmeError::TemplateParse(format!(
                        "line {line}: missing value for command"
                    )));
                }
                let name = parse_field(action).ok_or_else(|| {
                    ReadmeError::TemplateParse(format!(
                        "line {line}: unsupported action {OPEN}{action}{CLOSE}"
                    ))
                })?;
                segments.push(Segment::Field { name: name.to_string(), line });
            }

            line += tail[..end].matches('\n').count();
            rest = &tail[end + CLOSE.len()..];
            trim_next = trim_right;
        }
        push_text(&mut segments, rest, trim_next, false);

        Ok(Self { segments })
    }

    /// Render with `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeError::TemplateExecute`] if a field is unknown.
    pub fn render(&self, data: &TemplateData<'_>) -> Result<String, ReadmeError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field { name, line } => {
                    let value = data.field(name).ok_or_else(|| {
                        ReadmeError::TemplateExecute(format!(
                            "line {line}: can't evaluate field {name}"
                        ))
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str, trim_start: bool, trim_end: bool) {
    let text = if trim_start { text.trim_start() } else { text };
    let text = if trim_end { text.trim_end() } else { text };
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Offset of the `}}` that closes a comment action starting in `tail`.
///
/// Only a `*/` followed by `}}` (or ` -}}`) ends the comment, so the body
/// may contain `}}`.
fn comment_end(tail: &str) -> Option<usize> {
    let mut from = tail.find(COMMENT_OPEN)? + COMMENT_OPEN.len();
    while let Some(i) = tail[from..].find(COMMENT_CLOSE) {
        let after = from + i + COMMENT_CLOSE.len();
        let gap = tail[after..].len() - tail[after..].trim_start().len();
        let next = &tail[after + gap..];
        if next.starts_with(CLOSE) {
            return Some(after + gap);
        }
        if gap > 0 && next.strip_prefix(TRIM).is_some_and(|n| n.starts_with(CLOSE)) {
            return Some(after + gap + 1);
        }
        from = after;
    }
    None
}

/// `.Name` with an identifier after the dot.
fn parse_field(action: &str) -> Option<&str> {
    let name = action.strip_prefix('.')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if (first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

/// Read, parse and render the template at `path`.
///
/// # Errors
///
/// Returns [`ReadmeError::TemplateRead`], [`ReadmeError::TemplateParse`]
/// or [`ReadmeError::TemplateExecute`] depending on the stage that failed.
pub fn render_file(path: &Path, data: &TemplateData<'_>) -> Result<String, ReadmeError> {
    let source = std::fs::read_to_string(path)
        .map_err(|source| ReadmeError::TemplateRead { path: path.to_path_buf(), source })?;
    Template::parse(&source)?.render(data)
}

/// Current local time as RFC 3339 with seconds precision.
#[must_use]
pub fn build_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    const DATA: TemplateData<'static> = TemplateData {
        image_url: "data:image/png;base64,AAAA",
        build_timestamp: "2026-10-16T08:00:00Z",
    };

    fn render(source: &str) -> Result<String, ReadmeError> {
        Template::parse(source)?.render(&DATA)
    }

    #[test]
    fn substitutes_both_placeholders() {
        let out = render("![top albums]({{.ImageURL}})\n\n_Updated {{.BuildTimestamp}}_\n").unwrap();
        assert_eq!(
            out,
            "![top albums](data:image/png;base64,AAAA)\n\n_Updated 2026-10-16T08:00:00Z_\n"
        );
    }

    #[test]
    fn whitespace_inside_braces() {
        assert_eq!(
            render("{{ .ImageURL }}|{{\t.BuildTimestamp\n}}").unwrap(),
            "data:image/png;base64,AAAA|2026-10-16T08:00:00Z"
        );
    }

    #[test]
    fn repeated_placeholder_and_plain_text() {
        assert_eq!(render("{{.ImageURL}}{{.ImageURL}}").unwrap().matches("AAAA").count(), 2);
        assert_eq!(render("no actions at all").unwrap(), "no actions at all");
        assert_eq!(render("").unwrap(), "");
    }

    #[test]
    fn comments_render_as_nothing() {
        assert_eq!(render("a{{/* hidden */}}b").unwrap(), "ab");
    }

    #[test]
    fn comment_may_contain_closing_braces() {
        assert_eq!(render("a{{/* see }} here */}}b").unwrap(), "ab");
        assert_eq!(
            render("a{{ /* x }} y */ }}b{{.ImageURL}}").unwrap(),
            "abdata:image/png;base64,AAAA"
        );
    }

    #[test]
    fn trim_markers_eat_adjacent_whitespace() {
        assert_eq!(
            render("a  \n{{- .ImageURL -}} \n\tb").unwrap(),
            "adata:image/png;base64,AAAAb"
        );
        assert_eq!(render("x {{- .ImageURL}} y").unwrap(), "xdata:image/png;base64,AAAA y");
        assert_eq!(render("x {{.ImageURL -}} y").unwrap(), "x data:image/png;base64,AAAAy");
        assert_eq!(render("a\n{{- /* gone */ -}}\nb").unwrap(), "ab");
    }

    #[test]
    fn trim_marker_needs_whitespace() {
        for source in ["{{-.ImageURL}}", "{{.ImageURL-}}", "{{-}}"] {
            let err = render(source).unwrap_err();
            assert!(matches!(err, ReadmeError::TemplateParse(_)), "{source}: {err}");
        }
    }

    #[test]
    fn line_numbers_survive_trimming() {
        let err = render("a\n\n{{- .Username}}").unwrap_err();
        assert_eq!(err.to_string(), "executing template: line 3: can't evaluate field Username");
    }

    #[test]
    fn unclosed_action_is_a_parse_error() {
        let err = render("line one\n{{.ImageURL").unwrap_err();
        assert!(matches!(err, ReadmeError::TemplateParse(_)), "got {err}");
        assert_eq!(err.to_string(), "parsing template: line 2: unclosed action");
    }

    #[test]
    fn bad_actions_are_parse_errors() {
        for source in ["{{}}", "{{ }}", "{{ImageURL}}", "{{.}}", "{{.Image URL}}", "{{/* open }}"] {
            let err = render(source).unwrap_err();
            assert!(matches!(err, ReadmeError::TemplateParse(_)), "{source}: {err}");
        }
    }

    #[test]
    fn unknown_field_is_an_execute_error() {
        let err = render("\n\n{{.Username}}").unwrap_err();
        assert!(matches!(err, ReadmeError::TemplateExecute(_)), "got {err}");
        assert_eq!(err.to_string(), "executing template: line 3: can't evaluate field Username");
    }

    #[test]
    fn render_file_reads_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md.tmpl");
        std::fs::write(&path, "<img src=\"{{.ImageURL}}\">").unwrap();
        assert_eq!(
            render_file(&path, &DATA).unwrap(),
            "<img src=\"data:image/png;base64,AAAA\">"
        );
    }

    #[test]
    fn missing_template_is_a_read_error() {
        let err = render_file(Path::new("/nonexistent/README.md.tmpl"), &DATA).unwrap_err();
        assert!(matches!(err, ReadmeError::TemplateRead { .. }), "got {err}");
        assert!(err.to_string().starts_with("reading /nonexistent/README.md.tmpl"));
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = build_timestamp();
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok(), "not RFC 3339: {ts}");
        assert!(!ts.contains('.'), "expected whole seconds: {ts}");
    }

    #[test]
    fn rendered_timestamp_round_trips() {
        let ts = build_timestamp();
        let data = TemplateData { image_url: "x", build_timestamp: &ts };
        let out = Template::parse("built {{.BuildTimestamp}}").unwrap().render(&data).unwrap();
        let rendered = out.strip_prefix("built ").unwrap();
        assert!(DateTime::parse_from_rfc3339(rendered).is_ok());
    }
}
