//! Type definitions of a low-level SQL string representation.

use super::dialect::Dialect;
use super::format::{Error, FormatOptions};
use super::value::Value;

/// A SQL string under construction. Everything appended through
/// `append_identifier` and `append_value` is quoted or escaped.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SQL {
    pub sql: String,
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
        }
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append an identifier. A list appends each of its names, comma-separated.
    pub fn append_identifier(&mut self, value: &Value, dialect: Dialect) -> Result<(), Error> {
        match value {
            Value::String(name) => {
                self.sql.push_str(&dialect.quote_identifier(name));
                Ok(())
            }
            Value::List(names) => {
                for (index, name) in names.iter().enumerate() {
                    if index > 0 {
                        self.append_syntax(", ");
                    }
                    match name {
                        Value::String(_) => self.append_identifier(name, dialect)?,
                        other => return Err(Error::InvalidIdentifier(other.kind())),
                    }
                }
                Ok(())
            }
            other => Err(Error::InvalidIdentifier(other.kind())),
        }
    }

    /// Append an escaped literal value.
    pub fn append_value(&mut self, value: &Value, options: &FormatOptions) {
        match value {
            Value::Null => self.append_syntax("NULL"),
            Value::Bool(true) => self.append_syntax("true"),
            Value::Bool(false) => self.append_syntax("false"),
            Value::Number(number) => self.sql.push_str(&number.to_string()),
            Value::String(string) => self.sql.push_str(&options.dialect.quote_string(string)),
            Value::Timestamp(timestamp) => {
                let rendered = timestamp.to_sql_string(options.time_zone);
                self.sql.push_str(&options.dialect.quote_string(&rendered));
            }
            Value::List(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        self.append_syntax(", ");
                    }
                    if let Value::List(_) = value {
                        self.append_syntax("(");
                        self.append_value(value, options);
                        self.append_syntax(")");
                    } else {
                        self.append_value(value, options);
                    }
                }
            }
        }
    }
}
