//! Templates with identifier (`??`) and value (`?`) placeholders, and the
//! render pass that substitutes them.

use thiserror::Error;

use super::dialect::Dialect;
use super::string::SQL;
use super::value::{TimeZone, Value};

/// Errors raised while rendering a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("a {0} value cannot be used as an identifier")]
    InvalidIdentifier(&'static str),
    #[error("invalid time zone '{0}', expected 'local', 'Z' or an offset such as '+05:30'")]
    InvalidTimeZone(String),
}

/// How values are quoted and escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub dialect: Dialect,
    pub time_zone: TimeZone,
}

/// One piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Emitted verbatim.
    Text(String),
    /// `??`, consumes one value and quotes it as an identifier.
    Identifier,
    /// `?`, consumes one value and escapes it as a literal.
    Value,
}

/// A parsed template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new() -> Template {
        Template::default()
    }

    /// Parse a template string. A run of one `?` is a value placeholder, a run
    /// of two is an identifier placeholder, longer runs are literal text.
    pub fn parse(template: &str) -> Template {
        let mut parsed = Template::new();
        let mut rest = template;

        while let Some(start) = rest.find('?') {
            let run = rest[start..].bytes().take_while(|b| *b == b'?').count();
            let (marks, tail) = rest[start..].split_at(run);
            parsed.push_text(&rest[..start]);
            match run {
                1 => parsed.segments.push(Segment::Value),
                2 => parsed.segments.push(Segment::Identifier),
                _ => parsed.push_text(marks),
            }
            rest = tail;
        }
        parsed.push_text(rest);
        parsed
    }

    /// Append text that is never scanned for placeholders.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    /// Append all segments of another template.
    pub fn push_template(&mut self, other: Template) {
        for segment in other.segments {
            match segment {
                Segment::Text(text) => self.push_text(&text),
                placeholder => self.segments.push(placeholder),
            }
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The number of values a full render consumes.
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| !matches!(segment, Segment::Text(_)))
            .count()
    }

    /// Substitute placeholders left to right. Once `values` is exhausted the
    /// remaining placeholders are emitted as written; surplus values are ignored.
    pub fn render(&self, values: &[Value], options: &FormatOptions) -> Result<String, Error> {
        let mut sql = SQL::new();
        let mut values = values.iter();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => sql.append_syntax(text),
                Segment::Identifier => match values.next() {
                    Some(value) => sql.append_identifier(value, options.dialect)?,
                    None => sql.append_syntax("??"),
                },
                Segment::Value => match values.next() {
                    Some(value) => sql.append_value(value, options),
                    None => sql.append_syntax("?"),
                },
            }
        }
        Ok(sql.sql)
    }
}

/// Parse `template` and render it against `values`.
pub fn format(template: &str, values: &[Value], options: &FormatOptions) -> Result<String, Error> {
    Template::parse(template).render(values, options)
}
