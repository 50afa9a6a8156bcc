use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::catalog::normalize_column;
use crate::errors::{PipelineError, PipelineResult};

/// A typed predicate operand. Numbers compare numerically, text compares exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Text(String),
}

impl Operand {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Number(_) => "numeric",
            Operand::Text(_) => "text",
        }
    }

    fn from_json(column: &str, value: &serde_json::Value) -> PipelineResult<Operand> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Operand::Number).ok_or_else(|| {
                PipelineError::MalformedCondition {
                    column: column.to_string(),
                    reason: format!("number {n} out of range"),
                }
            }),
            serde_json::Value::String(s) => Ok(Operand::Text(s.clone())),
            other => Err(PipelineError::MalformedCondition {
                column: column.to_string(),
                reason: format!("operand must be a number or a string, got {other}"),
            }),
        }
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::Number(n)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Text(s.to_string())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// One column-scoped filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals { column: String, value: Operand },
    LessThan { column: String, value: Operand },
    GreaterThan { column: String, value: Operand },
    /// Inclusive on both bounds.
    Between { column: String, low: Operand, high: Operand },
}

impl Predicate {
    /// Builds a predicate from an `(operator, operands...)` descriptor.
    pub fn from_descriptor(
        column: &str,
        operator: &str,
        operands: &[Operand],
    ) -> PipelineResult<Predicate> {
        let column = normalize_column(column);
        let arity = |n: usize| {
            if operands.len() == n {
                Ok(())
            } else {
                Err(PipelineError::MalformedCondition {
                    column: column.clone(),
                    reason: format!(
                        "operator '{operator}' takes {n} operand(s), got {}",
                        operands.len()
                    ),
                })
            }
        };

        match operator.trim().to_lowercase().as_str() {
            "==" | "=" => {
                arity(1)?;
                Ok(Predicate::Equals { column: column.clone(), value: operands[0].clone() })
            }
            "<" => {
                arity(1)?;
                Ok(Predicate::LessThan { column: column.clone(), value: operands[0].clone() })
            }
            ">" => {
                arity(1)?;
                Ok(Predicate::GreaterThan { column: column.clone(), value: operands[0].clone() })
            }
            "between" => {
                arity(2)?;
                Ok(Predicate::Between {
                    column: column.clone(),
                    low: operands[0].clone(),
                    high: operands[1].clone(),
                })
            }
            _ => Err(PipelineError::UnsupportedOperator {
                column,
                operator: operator.to_string(),
            }),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::Equals { column, .. }
            | Predicate::LessThan { column, .. }
            | Predicate::GreaterThan { column, .. }
            | Predicate::Between { column, .. } => column,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { column, value } => write!(f, "`{column}` == {value}"),
            Predicate::LessThan { column, value } => write!(f, "`{column}` < {value}"),
            Predicate::GreaterThan { column, value } => write!(f, "`{column}` > {value}"),
            Predicate::Between { column, low, high } => {
                write!(f, "{low} <= `{column}` <= {high}")
            }
        }
    }
}

/// An operator plus its operands, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub operator: String,
    pub operands: Vec<Operand>,
}

impl Condition {
    pub fn new<I>(operator: &str, operands: I) -> Self
    where
        I: IntoIterator<Item = Operand>,
    {
        Self {
            operator: operator.to_string(),
            operands: operands.into_iter().collect(),
        }
    }
}

/// A conjunction of predicates plus an optional facility projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    /// Upper-case facility categories to keep. Empty means no projection.
    pub facilities: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from column → condition pairs. `None` conditions carry
    /// no constraint and are skipped.
    pub fn from_conditions<I, S>(conditions: I) -> PipelineResult<Query>
    where
        I: IntoIterator<Item = (S, Option<Condition>)>,
        S: AsRef<str>,
    {
        let mut query = Query::new();
        for (column, condition) in conditions {
            let Some(condition) = condition else {
                continue;
            };
            query.predicates.push(Predicate::from_descriptor(
                column.as_ref(),
                &condition.operator,
                &condition.operands,
            )?);
        }
        Ok(query)
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn with_facilities<I, S>(mut self, facilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.facilities = facilities
            .into_iter()
            .map(|f| normalize_column(f.as_ref()))
            .collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.facilities.is_empty()
    }
}

/// JSON shape of a hand-written query file:
///
/// ```json
/// { "conditions": { "AVERAGE RENT": ["between", 2000, 2800], "BORO": null },
///   "facilities": ["BUS STATION"] }
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct QueryFile {
    #[serde(default)]
    pub conditions: BTreeMap<String, Option<Vec<serde_json::Value>>>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl QueryFile {
    pub fn into_query(self) -> PipelineResult<Query> {
        let mut conditions = Vec::with_capacity(self.conditions.len());
        for (column, descriptor) in self.conditions {
            let condition = match descriptor {
                None => None,
                Some(parts) => {
                    let (operator, operands) =
                        parts.split_first().ok_or_else(|| PipelineError::MalformedCondition {
                            column: column.clone(),
                            reason: "empty condition".to_string(),
                        })?;
                    let operator = operator.as_str().ok_or_else(|| {
                        PipelineError::MalformedCondition {
                            column: column.clone(),
                            reason: "operator must be a string".to_string(),
                        }
                    })?;
                    let operands = operands
                        .iter()
                        .map(|v| Operand::from_json(&column, v))
                        .collect::<PipelineResult<Vec<_>>>()?;
                    Some(Condition::new(operator, operands))
                }
            };
            conditions.push((column, condition));
        }

        Ok(Query::from_conditions(conditions)?.with_facilities(self.facilities))
    }
}
