//! Compile a filter document into a SQL predicate.
//!
//! Entries of a query are classified by shape: connectives recurse over a
//! list of queries, scalars are shorthand for `$eq`, arrays for `$in`, and
//! objects are field filters whose keys are operators. Negation is never
//! applied to rendered text; instead `$not`, `$nor` and `$nand` compile
//! their operands with the dual operator table.

pub mod fragment;
pub mod operators;
pub mod query;

use sqlfilter_configuration::Configuration;

use crate::translation::error::Error;
use fragment::Fragment;
use operators::{Connective, OperatorTable, Rule, DIRECT};
use query::{Operand, Query};

/// Compile a filter with the default configuration. An absent or empty
/// filter compiles to the empty string.
pub fn build(query: Option<&Query>) -> Result<String, Error> {
    build_with(&Configuration::default(), query, &DIRECT)
}

/// Compile a filter with `table` as the active operator table.
pub fn build_with(
    configuration: &Configuration,
    query: Option<&Query>,
    table: &OperatorTable,
) -> Result<String, Error> {
    let Some(query) = query else {
        return Ok(String::new());
    };
    let sql = Compiler { configuration }.compile(query.iter(), table, 0)?;
    tracing::debug!(%sql, polarity = ?table.polarity(), "compiled filter");
    Ok(sql)
}

struct Compiler<'a> {
    configuration: &'a Configuration,
}

impl Compiler<'_> {
    fn compile<'q>(
        &self,
        entries: impl IntoIterator<Item = (&'q str, &'q Operand)>,
        table: &OperatorTable,
        depth: usize,
    ) -> Result<String, Error> {
        if depth > self.configuration.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.configuration.max_depth,
            });
        }

        let mut fragments = Vec::new();
        for (key, operand) in entries {
            tracing::trace!(key, kind = operand.kind(), depth, "compiling entry");
            if key.starts_with('$') {
                match table.lookup(key)? {
                    Rule::Connective(connective) => fragments
                        .extend(self.connective(connective, key, operand, table, depth)?),
                    Rule::Compare(_) | Rule::Not => {
                        return Err(Error::UnknownOperator(key.to_string()))
                    }
                }
                continue;
            }
            match operand {
                Operand::Object(filter) => {
                    for (operator, operand) in filter.iter() {
                        fragments.extend(self.apply(operator, key, operand, table, depth)?);
                    }
                }
                Operand::Array(_) => {
                    fragments.extend(self.apply("$in", key, operand, table, depth)?);
                }
                _ => fragments.extend(self.apply("$eq", key, operand, table, depth)?),
            }
        }

        fragment::render(fragments, &self.configuration.format)
    }

    /// Apply one operator of a field filter.
    fn apply(
        &self,
        operator: &str,
        field: &str,
        operand: &Operand,
        table: &OperatorTable,
        depth: usize,
    ) -> Result<Option<Fragment>, Error> {
        match table.lookup(operator)? {
            Rule::Compare(comparison) => comparison.predicate(operator, field, operand).map(Some),
            Rule::Not => {
                let sql = self.compile([(field, operand)], table.dual(), depth + 1)?;
                Ok(non_empty(sql))
            }
            Rule::Connective(_) => Err(Error::UnknownOperator(operator.to_string())),
        }
    }

    fn connective(
        &self,
        connective: Connective,
        key: &str,
        operand: &Operand,
        table: &OperatorTable,
        depth: usize,
    ) -> Result<Option<Fragment>, Error> {
        let Operand::Array(queries) = operand else {
            return Err(Error::invalid_operand(
                key,
                format!("expected an array of filters, found {}", operand.kind()),
            ));
        };
        let table = if connective.uses_dual() {
            table.dual()
        } else {
            table
        };

        let mut parts = Vec::with_capacity(queries.len());
        for query in queries {
            let sql = match query {
                Operand::Object(query) => self.compile(query.iter(), table, depth + 1)?,
                Operand::Null => continue,
                other => {
                    return Err(Error::invalid_operand(
                        key,
                        format!("expected an array of filters, found an array of {}", other.kind()),
                    ))
                }
            };
            if !sql.is_empty() {
                parts.push(sql);
            }
        }

        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(Fragment::Rendered(connective.render(&parts))))
    }
}

fn non_empty(sql: String) -> Option<Fragment> {
    if sql.is_empty() {
        None
    } else {
        Some(Fragment::Rendered(sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_engine_sql::sql::dialect::Dialect;
    use serde_json::json;

    fn compile(filter: serde_json::Value) -> Result<String, Error> {
        let query = Query::from_json(filter)?;
        build(query.as_ref())
    }

    #[test]
    fn scalars_are_equality_shorthand() {
        assert_eq!(compile(json!({ "name": "santiago" })).unwrap(), "`name` = 'santiago'");
        assert_eq!(compile(json!({ "id": 1 })).unwrap(), "`id` = 1");
        assert_eq!(compile(json!({ "active": true })).unwrap(), "`active` = true");
        assert_eq!(compile(json!({ "name": null })).unwrap(), "`name` = NULL");
    }

    #[test]
    fn arrays_are_membership_shorthand() {
        assert_eq!(
            compile(json!({ "name": ["santi", "vicky"] })).unwrap(),
            "`name` IN ('santi', 'vicky')"
        );
    }

    #[test]
    fn vacuous_filters_compile_to_nothing() {
        assert_eq!(build(None).unwrap(), "");
        assert_eq!(compile(json!(null)).unwrap(), "");
        assert_eq!(compile(json!({})).unwrap(), "");
        assert_eq!(compile(json!({ "id": {}, "code": {} })).unwrap(), "");
    }

    #[test]
    fn negation_at_the_top_flips_every_comparison() {
        let query = Query::from_json(json!({ "id": { "$gt": 10, "$lt": 100 } }))
            .unwrap()
            .unwrap();
        let sql = build_with(&Configuration::default(), Some(&query), DIRECT.dual()).unwrap();
        assert_eq!(sql, "`id` <= 10 AND `id` >= 100");
    }

    #[test]
    fn not_with_a_scalar_negates_the_shorthand() {
        assert_eq!(compile(json!({ "id": { "$not": 5 } })).unwrap(), "`id` != 5");
        assert_eq!(
            compile(json!({ "id": { "$not": [1, 2] } })).unwrap(),
            "`id` NOT IN (1, 2)"
        );
    }

    #[test]
    fn empty_not_contributes_nothing() {
        assert_eq!(
            compile(json!({ "id": { "$not": {} }, "code": 3 })).unwrap(),
            "`code` = 3"
        );
    }

    #[test]
    fn connectives_skip_empty_sub_queries() {
        assert_eq!(
            compile(json!({ "$and": [{}, { "a": 1 }, null] })).unwrap(),
            "(`a` = 1)"
        );
        assert_eq!(compile(json!({ "$or": [] })).unwrap(), "");
        assert_eq!(compile(json!({ "$or": [{}], "b": 2 })).unwrap(), "`b` = 2");
    }

    #[test]
    fn operators_are_checked_where_they_appear() {
        for filter in [
            json!({ "$eq": 1 }),
            json!({ "$not": { "a": 1 } }),
            json!({ "$xor": [] }),
            json!({ "a": { "$and": [] } }),
            json!({ "a": { "b": 1 } }),
            json!({ "a": { "$regex": "x" } }),
        ] {
            assert!(
                matches!(compile(filter.clone()), Err(Error::UnknownOperator(_))),
                "{filter}"
            );
        }
    }

    #[test]
    fn connectives_need_arrays_of_filters() {
        assert!(matches!(
            compile(json!({ "$and": { "a": 1 } })),
            Err(Error::InvalidOperand { operator, .. }) if operator == "$and"
        ));
        assert!(matches!(
            compile(json!({ "$or": [1, 2] })),
            Err(Error::InvalidOperand { operator, .. }) if operator == "$or"
        ));
    }

    #[test]
    fn comparisons_need_literal_operands() {
        assert!(matches!(
            compile(json!({ "a": { "$eq": { "b": 1 } } })),
            Err(Error::InvalidOperand { operator, .. }) if operator == "$eq"
        ));
        assert!(matches!(
            compile(json!({ "a": { "$like": ["x"] } })),
            Err(Error::InvalidOperand { operator, .. }) if operator == "$like"
        ));
    }

    #[test]
    fn empty_membership_lists_render_constants() {
        assert_eq!(compile(json!({ "a": { "$in": [] } })).unwrap(), "1 = 0");
        assert_eq!(compile(json!({ "a": { "$nin": [] } })).unwrap(), "1 = 1");
        assert_eq!(compile(json!({ "a": [] })).unwrap(), "1 = 0");
        assert_eq!(compile(json!({ "a": { "$not": { "$in": [] } } })).unwrap(), "1 = 1");
    }

    #[test]
    fn scalar_membership_operands_are_one_element_lists() {
        assert_eq!(compile(json!({ "a": { "$in": 3 } })).unwrap(), "`a` IN (3)");
    }

    #[test]
    fn nesting_is_bounded() {
        let configuration = Configuration {
            max_depth: 2,
            ..Configuration::default()
        };
        let shallow = Query::from_json(json!({ "a": { "$not": { "$not": 1 } } }))
            .unwrap()
            .unwrap();
        assert_eq!(
            build_with(&configuration, Some(&shallow), &DIRECT).unwrap(),
            "`a` = 1"
        );

        let deep = Query::from_json(json!({ "a": { "$not": { "$not": { "$not": 1 } } } }))
            .unwrap()
            .unwrap();
        assert!(matches!(
            build_with(&configuration, Some(&deep), &DIRECT),
            Err(Error::NestingTooDeep { limit: 2 })
        ));
    }

    #[test]
    fn dialect_comes_from_the_configuration() {
        let mut configuration = Configuration::default();
        configuration.format.dialect = Dialect::Postgres;
        let query = Query::new().with("name", "O'Brien");
        assert_eq!(
            build_with(&configuration, Some(&query), &DIRECT).unwrap(),
            "\"name\" = 'O''Brien'"
        );
    }
}
