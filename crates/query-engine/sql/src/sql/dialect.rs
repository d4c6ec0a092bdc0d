//! Quoting rules of the SQL dialects we can render for.

use std::fmt;

/// The SQL dialect used to quote identifiers and string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Backtick-quoted identifiers, backslash escapes in strings.
    #[default]
    MySql,
    /// Double-quoted identifiers, standard `''` escapes in strings.
    Postgres,
}

impl Dialect {
    pub fn name(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
        }
    }

    /// Quote an identifier. A dotted name is quoted segment by segment, so
    /// `table.column` refers to a qualified column.
    pub fn quote_identifier(self, name: &str) -> String {
        let quote = match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        };
        let doubled = format!("{quote}{quote}");

        let mut quoted = String::with_capacity(name.len() + 2);
        for (index, segment) in name.split('.').enumerate() {
            if index > 0 {
                quoted.push('.');
            }
            quoted.push(quote);
            quoted.push_str(&segment.replace(quote, &doubled));
            quoted.push(quote);
        }
        quoted
    }

    /// Quote a string literal.
    pub fn quote_string(self, value: &str) -> String {
        match self {
            Dialect::MySql => {
                let mut quoted = String::with_capacity(value.len() + 2);
                quoted.push('\'');
                for ch in value.chars() {
                    match ch {
                        '\0' => quoted.push_str("\\0"),
                        '\u{8}' => quoted.push_str("\\b"),
                        '\t' => quoted.push_str("\\t"),
                        '\n' => quoted.push_str("\\n"),
                        '\r' => quoted.push_str("\\r"),
                        '\u{1a}' => quoted.push_str("\\Z"),
                        '"' => quoted.push_str("\\\""),
                        '\'' => quoted.push_str("\\'"),
                        '\\' => quoted.push_str("\\\\"),
                        other => quoted.push(other),
                    }
                }
                quoted.push('\'');
                quoted
            }
            Dialect::Postgres => format!("'{}'", value.replace('\'', "''")),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
