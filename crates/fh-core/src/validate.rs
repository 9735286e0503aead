//! Input-contract checks shared by the registry, projector and assembler.

use std::collections::{BTreeSet, HashSet};

use crate::errors::{ErrorInfo, HubError};
use crate::table::{Column, ColumnData, Table};

/// Fails with `EmptyInput` when the table has no rows.
pub fn require_rows(table: &Table, what: &str) -> Result<(), HubError> {
    if table.is_empty() {
        return Err(HubError::EmptyInput(
            ErrorInfo::new("input.empty_table", format!("the {what} table is empty"))
                .with_list("columns", table.column_names()),
        ));
    }
    Ok(())
}

/// Fails with `EmptyInput` when the slice has no elements.
pub fn require_elements<T>(values: &[T], what: &str) -> Result<(), HubError> {
    if values.is_empty() {
        return Err(HubError::EmptyInput(ErrorInfo::new(
            "input.empty_list",
            format!("the {what} list is empty"),
        )));
    }
    Ok(())
}

/// Returns the named column or fails with `MissingColumn`.
pub fn require_column<'a>(table: &'a Table, column: &str) -> Result<&'a Column, HubError> {
    table.column(column).ok_or_else(|| {
        HubError::MissingColumn(
            ErrorInfo::new(
                "input.missing_column",
                format!("column '{column}' not found in the table"),
            )
            .with_context("column", column)
            .with_list("available", table.column_names()),
        )
    })
}

/// Returns the values of a text column, failing with `MissingColumn` or
/// `TypeMismatch`.
pub fn require_text_column<'a>(table: &'a Table, column: &str) -> Result<&'a [String], HubError> {
    match require_column(table, column)?.data() {
        ColumnData::Text(values) => Ok(values),
        other => Err(HubError::TypeMismatch(
            ErrorInfo::new(
                "input.column_type",
                format!("column '{column}' holds {} values, expected text", other.type_name()),
            )
            .with_context("column", column)
            .with_context("found", other.type_name()),
        )),
    }
}

/// Values not contained in `valid`, sorted and deduplicated.
pub fn values_outside<'a, I>(values: I, valid: &HashSet<&str>) -> BTreeSet<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .map(String::as_str)
        .filter(|value| !valid.contains(value))
        .collect()
}

/// Checks that levels are non-empty, finite, inside (0, 1) and strictly
/// increasing.
pub fn require_increasing_levels(levels: &[f64]) -> Result<(), HubError> {
    if levels.is_empty() {
        return Err(HubError::InvalidQuantileLevels(ErrorInfo::new(
            "levels.empty",
            "at least one quantile level is required",
        )));
    }
    if let Some(bad) = levels
        .iter()
        .find(|level| !level.is_finite() || **level <= 0.0 || **level >= 1.0)
    {
        return Err(HubError::InvalidQuantileLevels(
            ErrorInfo::new(
                "levels.out_of_range",
                format!("quantile level {bad} is not a probability in (0, 1)"),
            )
            .with_context("level", bad.to_string()),
        ));
    }
    if let Some(pair) = levels.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(HubError::InvalidQuantileLevels(
            ErrorInfo::new(
                "levels.not_increasing",
                format!(
                    "quantile levels must be strictly increasing; {} is followed by {}",
                    pair[0], pair[1]
                ),
            )
            .with_context("previous", pair[0].to_string())
            .with_context("next", pair[1].to_string()),
        ));
    }
    Ok(())
}
