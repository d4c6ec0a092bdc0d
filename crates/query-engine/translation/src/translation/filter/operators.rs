//! The two operator tables, `DIRECT` and `NEGATED`.
//!
//! Both are built from the same list of operators. The negated table maps
//! every comparison to its complement and leaves `$not` and the connectives
//! as they are, since those are defined relative to whichever table is
//! active. One table is therefore always the Boolean dual of the other.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use enum_iterator::{all, Sequence};

use query_engine_sql::sql::value::Value;

use super::fragment::Fragment;
use super::query::Operand;
use crate::translation::error::Error;

/// Every key a table recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    Nin,
    Not,
    And,
    Or,
    Nor,
    Nand,
}

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Like => "$like",
            Operator::In => "$in",
            Operator::Nin => "$nin",
            Operator::Not => "$not",
            Operator::And => "$and",
            Operator::Or => "$or",
            Operator::Nor => "$nor",
            Operator::Nand => "$nand",
        }
    }

    /// What the operator means in the direct table.
    fn direct_rule(self) -> Rule {
        match self {
            Operator::Eq => Rule::Compare(Comparison::Equal),
            Operator::Ne => Rule::Compare(Comparison::NotEqual),
            Operator::Gt => Rule::Compare(Comparison::GreaterThan),
            Operator::Gte => Rule::Compare(Comparison::GreaterThanOrEqual),
            Operator::Lt => Rule::Compare(Comparison::LessThan),
            Operator::Lte => Rule::Compare(Comparison::LessThanOrEqual),
            Operator::Like => Rule::Compare(Comparison::Like),
            Operator::In => Rule::Compare(Comparison::In),
            Operator::Nin => Rule::Compare(Comparison::NotIn),
            Operator::Not => Rule::Not,
            Operator::And => Rule::Connective(Connective::And),
            Operator::Or => Rule::Connective(Connective::Or),
            Operator::Nor => Rule::Connective(Connective::Nor),
            Operator::Nand => Rule::Connective(Connective::Nand),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A comparison as rendered in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    In,
    NotIn,
}

impl Comparison {
    /// The comparison that holds exactly when this one does not.
    pub fn complement(self) -> Comparison {
        match self {
            Comparison::Equal => Comparison::NotEqual,
            Comparison::NotEqual => Comparison::Equal,
            Comparison::GreaterThan => Comparison::LessThanOrEqual,
            Comparison::LessThanOrEqual => Comparison::GreaterThan,
            Comparison::GreaterThanOrEqual => Comparison::LessThan,
            Comparison::LessThan => Comparison::GreaterThanOrEqual,
            Comparison::Like => Comparison::NotLike,
            Comparison::NotLike => Comparison::Like,
            Comparison::In => Comparison::NotIn,
            Comparison::NotIn => Comparison::In,
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Comparison::Equal => "?? = ?",
            Comparison::NotEqual => "?? != ?",
            Comparison::GreaterThan => "?? > ?",
            Comparison::GreaterThanOrEqual => "?? >= ?",
            Comparison::LessThan => "?? < ?",
            Comparison::LessThanOrEqual => "?? <= ?",
            Comparison::Like => "?? LIKE ?",
            Comparison::NotLike => "?? NOT LIKE ?",
            Comparison::In => "?? IN (?)",
            Comparison::NotIn => "?? NOT IN (?)",
        }
    }

    /// Render `field <comparison> operand` as a template and its values.
    /// `operator` is the key the comparison was reached through, for errors.
    pub fn predicate(
        self,
        operator: &str,
        field: &str,
        operand: &Operand,
    ) -> Result<Fragment, Error> {
        let value = match self {
            Comparison::Like | Comparison::NotLike => {
                Value::String(format!("%{}%", like_text(operator, operand)?))
            }
            Comparison::In | Comparison::NotIn => {
                let values = match literal(operator, operand)? {
                    Value::List(values) => values,
                    scalar => vec![scalar],
                };
                // `IN ()` is not valid SQL.
                if values.is_empty() {
                    let constant = if self == Comparison::In { "1 = 0" } else { "1 = 1" };
                    return Ok(Fragment::Rendered(constant.to_string()));
                }
                Value::List(values)
            }
            _ => literal(operator, operand)?,
        };
        Ok(Fragment::leaf(
            self.template(),
            vec![Value::String(field.to_string()), value],
        ))
    }
}

fn literal(operator: &str, operand: &Operand) -> Result<Value, Error> {
    operand.to_value().ok_or_else(|| {
        Error::invalid_operand(operator, format!("expected a value, found {}", operand.kind()))
    })
}

/// The text a `$like` operand is matched as, before the `%` wrapping.
fn like_text(operator: &str, operand: &Operand) -> Result<String, Error> {
    match operand {
        Operand::String(s) => Ok(s.clone()),
        Operand::Number(n) => Ok(n.to_string()),
        Operand::Bool(b) => Ok(b.to_string()),
        other => Err(Error::invalid_operand(
            operator,
            format!("expected a string, number or boolean, found {}", other.kind()),
        )),
    }
}

/// A logical connective over a list of queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum Connective {
    And,
    Or,
    Nor,
    Nand,
}

impl Connective {
    /// Whether the sub-queries are compiled with the dual of the active table.
    pub fn uses_dual(self) -> bool {
        matches!(self, Connective::Nor | Connective::Nand)
    }

    pub fn joiner(self) -> &'static str {
        match self {
            Connective::And | Connective::Nand => ") AND (",
            Connective::Or | Connective::Nor => ") OR (",
        }
    }

    /// The opening and closing text around the joined sub-queries.
    pub fn wrapping(self) -> (&'static str, &'static str) {
        match self {
            Connective::Or => ("((", "))"),
            Connective::And | Connective::Nor | Connective::Nand => ("(", ")"),
        }
    }

    /// Join rendered sub-queries.
    pub fn render(self, parts: &[String]) -> String {
        let (open, close) = self.wrapping();
        format!("{open}{}{close}", parts.join(self.joiner()))
    }
}

/// What a table does with an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Render one comparison.
    Compare(Comparison),
    /// Compile `{ field: operand }` with the dual table.
    Not,
    /// Compile each query of a list and join the results.
    Connective(Connective),
}

impl Rule {
    fn negate(self) -> Rule {
        match self {
            Rule::Compare(comparison) => Rule::Compare(comparison.complement()),
            relative => relative,
        }
    }
}

/// Which of the two tables is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum Polarity {
    Direct,
    Negated,
}

impl Polarity {
    pub fn flip(self) -> Polarity {
        match self {
            Polarity::Direct => Polarity::Negated,
            Polarity::Negated => Polarity::Direct,
        }
    }
}

/// An immutable mapping from operator name to rule.
#[derive(Debug)]
pub struct OperatorTable {
    polarity: Polarity,
    rules: BTreeMap<&'static str, Rule>,
}

/// The table filters are compiled with by default.
pub static DIRECT: LazyLock<OperatorTable> = LazyLock::new(|| OperatorTable::new(Polarity::Direct));

/// The dual of `DIRECT`: every comparison replaced by its complement.
pub static NEGATED: LazyLock<OperatorTable> =
    LazyLock::new(|| OperatorTable::new(Polarity::Negated));

impl OperatorTable {
    fn new(polarity: Polarity) -> OperatorTable {
        let rules = all::<Operator>()
            .map(|operator| {
                let rule = match polarity {
                    Polarity::Direct => operator.direct_rule(),
                    Polarity::Negated => operator.direct_rule().negate(),
                };
                (operator.name(), rule)
            })
            .collect();
        OperatorTable { polarity, rules }
    }

    /// The table for a polarity.
    pub fn for_polarity(polarity: Polarity) -> &'static OperatorTable {
        match polarity {
            Polarity::Direct => &DIRECT,
            Polarity::Negated => &NEGATED,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// The other table.
    pub fn dual(&self) -> &'static OperatorTable {
        OperatorTable::for_polarity(self.polarity.flip())
    }

    pub fn get(&self, name: &str) -> Option<Rule> {
        self.rules.get(name).copied()
    }

    /// Like `get`, failing with `UnknownOperator`.
    pub fn lookup(&self, name: &str) -> Result<Rule, Error> {
        self.get(name)
            .ok_or_else(|| Error::UnknownOperator(name.to_string()))
    }
}
