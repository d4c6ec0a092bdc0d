//! The pieces a filter compiles to before the final render.

use query_engine_sql::sql::format::{FormatOptions, Template};
use query_engine_sql::sql::value::Value;

use crate::translation::error::Error;

/// One predicate of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A comparison whose placeholders are still unresolved.
    Leaf { template: Template, values: Vec<Value> },
    /// Output of a nested compile. Its values are already escaped in the
    /// text, so it carries none and is never scanned for placeholders.
    Rendered(String),
}

impl Fragment {
    pub fn leaf(template: &str, values: Vec<Value>) -> Fragment {
        Fragment::Leaf {
            template: Template::parse(template),
            values,
        }
    }
}

/// Join fragments with `AND` and render them in one pass.
pub fn render(fragments: Vec<Fragment>, options: &FormatOptions) -> Result<String, Error> {
    let mut template = Template::new();
    let mut values = Vec::new();

    for (index, fragment) in fragments.into_iter().enumerate() {
        if index > 0 {
            template.push_text(" AND ");
        }
        match fragment {
            Fragment::Leaf {
                template: leaf,
                values: leaf_values,
            } => {
                template.push_template(leaf);
                values.extend(leaf_values);
            }
            Fragment::Rendered(text) => template.push_text(&text),
        }
    }

    Ok(template.render(&values, options)?)
}
