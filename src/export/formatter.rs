//! Cell value formatting
//!
//! Turns a cell into the SQL token embedded in a statement. The formatter is
//! a trait so a parameter-binding implementation can replace literal
//! embedding without touching statement assembly.

use crate::export::coerce::{
    DATE_LITERAL_FORMAT, parse_date, parse_float_prefix, parse_int_prefix, js_number_string,
};
use crate::models::{CellValue, ColumnType, TransformKind};
use crate::validation::ResolvedMapping;

/// SQL null token
pub const NULL: &str = "NULL";

/// Renders cell values as SQL tokens
pub trait ValueFormatter {
    /// Format a mapped cell, applying the mapping's transform and column type
    fn format(&self, value: &CellValue, mapping: &ResolvedMapping) -> String;

    /// Format a cell with no mapping: null or text
    fn format_untyped(&self, value: &CellValue) -> String;
}

/// Embeds values directly in the statement text as SQL literals.
///
/// Blank cells become `NULL`. Text is single-quoted with embedded quotes
/// doubled. Integer and decimal columns read the leading number of the cell,
/// and datetime columns emit a quoted `YYYY-MM-DD HH:MM:SS` literal. Anything
/// that cannot be read for a numeric or datetime column becomes `NULL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralEmbeddingFormatter;

impl ValueFormatter for LiteralEmbeddingFormatter {
    fn format(&self, value: &CellValue, mapping: &ResolvedMapping) -> String {
        if value.is_blank() {
            return NULL.to_string();
        }

        let transformed = match mapping.transform {
            Some(kind) => apply_transform(value, kind),
            None => value.clone(),
        };

        match mapping.column_type {
            ColumnType::Integer => integer_literal(&transformed),
            ColumnType::Decimal => decimal_literal(&transformed),
            ColumnType::DateTime => datetime_literal(&transformed),
            ColumnType::Text => quote_string(&transformed.to_text()),
        }
    }

    fn format_untyped(&self, value: &CellValue) -> String {
        match value {
            CellValue::Null => NULL.to_string(),
            other => quote_string(&other.to_text()),
        }
    }
}

/// Wrap text in single quotes, doubling embedded quotes
pub fn quote_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Apply a transform. Values a transform cannot read pass through unchanged.
pub fn apply_transform(value: &CellValue, kind: TransformKind) -> CellValue {
    match kind {
        TransformKind::Upper => CellValue::Text(value.to_text().to_uppercase()),
        TransformKind::Lower => CellValue::Text(value.to_text().to_lowercase()),
        TransformKind::Trim => CellValue::Text(value.to_text().trim().to_string()),
        TransformKind::Date => parse_date(value)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| value.clone()),
        TransformKind::Number => parse_float_prefix(&value.to_text())
            .map(CellValue::Number)
            .unwrap_or_else(|| value.clone()),
    }
}

fn integer_literal(value: &CellValue) -> String {
    if matches!(value, CellValue::DateTime(_)) {
        return NULL.to_string();
    }
    parse_int_prefix(&value.to_text()).unwrap_or_else(|| NULL.to_string())
}

fn decimal_literal(value: &CellValue) -> String {
    if matches!(value, CellValue::DateTime(_)) {
        return NULL.to_string();
    }
    match parse_float_prefix(&value.to_text()) {
        Some(n) if n.is_finite() => js_number_string(n),
        _ => NULL.to_string(),
    }
}

fn datetime_literal(value: &CellValue) -> String {
    match parse_date(value) {
        Some(dt) => format!("'{}'", dt.format(DATE_LITERAL_FORMAT)),
        None => NULL.to_string(),
    }
}
