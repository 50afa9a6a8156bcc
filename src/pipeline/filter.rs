// src/pipeline/filter.rs

use std::cmp::Ordering;
use tracing::{debug, info};

use crate::domain::catalog::{Catalog, CatalogRow, ResultSet, Value, IDENTITY_COLUMNS};
use crate::domain::query::{Operand, Predicate, Query};
use crate::errors::{PipelineError, PipelineResult};

/// Returns the catalog rows matching every predicate in `query`, narrowed to
/// the requested facility columns if any were requested.
///
/// Validation happens before any row is touched, so a bad query never yields
/// a partial result.
pub fn filter_catalog(catalog: &Catalog, query: &Query) -> PipelineResult<ResultSet> {
    for predicate in &query.predicates {
        if !catalog.has_column(predicate.column()) {
            return Err(PipelineError::UnknownColumn(predicate.column().to_string()));
        }
        check_ordering_operands(catalog, predicate)?;
        debug!(predicate = %predicate, "Applying predicate");
    }

    let columns = projected_columns(catalog, &query.facilities)?;

    let mut rows = Vec::new();
    for row in &catalog.rows {
        if matches_all(catalog, row, &query.predicates)? {
            rows.push(
                columns
                    .iter()
                    .map(|c| catalog.value(row, c).unwrap_or(Value::Missing))
                    .collect(),
            );
        }
    }

    info!(
        matched = rows.len(),
        total = catalog.len(),
        columns = columns.len(),
        "Apartments match preferences"
    );
    Ok(ResultSet { columns, rows })
}

/// Ordering operands must have the same kind as the column, whatever the rows hold.
fn check_ordering_operands(catalog: &Catalog, predicate: &Predicate) -> PipelineResult<()> {
    let operands = match predicate {
        Predicate::Equals { .. } => return Ok(()),
        Predicate::LessThan { value, .. } | Predicate::GreaterThan { value, .. } => vec![value],
        Predicate::Between { low, high, .. } => vec![low, high],
    };

    let numeric = catalog.is_numeric_column(predicate.column());
    match operands
        .into_iter()
        .find(|o| matches!(o, Operand::Number(_)) != numeric)
    {
        Some(operand) => Err(PipelineError::TypeMismatch {
            column: predicate.column().to_string(),
            operand: operand.kind(),
        }),
        None => Ok(()),
    }
}

fn projected_columns(catalog: &Catalog, facilities: &[String]) -> PipelineResult<Vec<String>> {
    if facilities.is_empty() {
        return Ok(catalog.columns());
    }

    let mut columns: Vec<String> = IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect();
    for category in facilities {
        if !catalog.has_category(category) {
            return Err(PipelineError::UnknownCategory(category.clone()));
        }
        if !columns.contains(category) {
            columns.push(category.clone());
        }
    }
    Ok(columns)
}

fn matches_all(catalog: &Catalog, row: &CatalogRow, predicates: &[Predicate]) -> PipelineResult<bool> {
    for predicate in predicates {
        let value = catalog
            .value(row, predicate.column())
            .ok_or_else(|| PipelineError::UnknownColumn(predicate.column().to_string()))?;
        if !evaluate(predicate, &value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluates one predicate against one cell. Missing cells never match.
pub fn evaluate(predicate: &Predicate, value: &Value) -> PipelineResult<bool> {
    match predicate {
        Predicate::Equals { value: operand, .. } => Ok(equals(value, operand)),
        Predicate::LessThan { column, value: operand } => {
            Ok(compare(column, value, operand)? == Some(Ordering::Less))
        }
        Predicate::GreaterThan { column, value: operand } => {
            Ok(compare(column, value, operand)? == Some(Ordering::Greater))
        }
        Predicate::Between { column, low, high } => {
            let above_low = matches!(
                compare(column, value, low)?,
                Some(Ordering::Greater | Ordering::Equal)
            );
            let below_high = matches!(
                compare(column, value, high)?,
                Some(Ordering::Less | Ordering::Equal)
            );
            Ok(above_low && below_high)
        }
    }
}

fn equals(value: &Value, operand: &Operand) -> bool {
    match (value, operand) {
        (Value::Number(v), Operand::Number(o)) => v == o,
        (Value::Text(v), Operand::Text(o)) => v == o,
        _ => false,
    }
}

/// Orders the cell against the operand. `None` means the cell is missing.
fn compare(column: &str, value: &Value, operand: &Operand) -> PipelineResult<Option<Ordering>> {
    match (value, operand) {
        (Value::Missing, _) => Ok(None),
        (Value::Number(v), Operand::Number(o)) => Ok(v.partial_cmp(o)),
        (Value::Text(v), Operand::Text(o)) => Ok(Some(v.as_str().cmp(o.as_str()))),
        _ => Err(PipelineError::TypeMismatch {
            column: column.to_string(),
            operand: operand.kind(),
        }),
    }
}
