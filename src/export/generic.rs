//! Row-keyed statement assembly
//!
//! Produces statements straight from row objects with no mapping: columns
//! are the keys of the first row, and every value is emitted as quoted text
//! (or `NULL`).

use crate::export::formatter::ValueFormatter;
use crate::export::sql::StatementBuilder;
use crate::models::{GenericOperation, GenericOptions, Row, SqlOutput};

impl<F: ValueFormatter> StatementBuilder<F> {
    /// Build row-keyed statements.
    ///
    /// With `bulk` off, INSERT yields a single multi-row statement while
    /// UPDATE and DELETE only cover the first row. With `bulk` on, every
    /// operation yields one statement per row.
    ///
    /// Callers validate first; see [`crate::validation::validate_generic`].
    pub fn generic(
        &self,
        data: &[Row],
        operation: GenericOperation,
        options: &GenericOptions,
    ) -> SqlOutput {
        let Some(first) = data.first() else {
            return SqlOutput::Statements(Vec::new());
        };
        let columns: Vec<&str> = first.columns().collect();
        let table = self.config().table(&options.table_name);

        let rows: &[Row] = if options.bulk || operation == GenericOperation::Insert {
            data
        } else {
            &data[..1]
        };

        let statements: Vec<String> = match operation {
            GenericOperation::Insert => {
                let column_list = columns
                    .iter()
                    .map(|c| self.config().column(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                let tuples: Vec<String> = rows.iter().map(|row| self.tuple(&columns, row)).collect();

                if options.bulk {
                    tuples
                        .iter()
                        .map(|t| format!("INSERT INTO {} ({}) VALUES {};", table, column_list, t))
                        .collect()
                } else {
                    vec![format!(
                        "INSERT INTO {} ({}) VALUES {};",
                        table,
                        column_list,
                        tuples.join(", ")
                    )]
                }
            }
            GenericOperation::Update => {
                let set_columns: Vec<&str> = columns
                    .iter()
                    .copied()
                    .filter(|c| !options.primary_keys.iter().any(|k| k == c))
                    .collect();
                rows.iter()
                    .map(|row| {
                        format!(
                            "UPDATE {} SET {} WHERE {};",
                            table,
                            self.pairs(set_columns.iter().copied(), row, ", "),
                            self.pairs(options.primary_keys.iter().map(String::as_str), row, " AND ")
                        )
                    })
                    .collect()
            }
            GenericOperation::Delete => rows
                .iter()
                .map(|row| {
                    format!(
                        "DELETE FROM {} WHERE {};",
                        table,
                        self.pairs(options.primary_keys.iter().map(String::as_str), row, " AND ")
                    )
                })
                .collect(),
        };

        if options.bulk {
            SqlOutput::Statements(statements)
        } else {
            SqlOutput::Text(statements.join("\n"))
        }
    }

    fn tuple(&self, columns: &[&str], row: &Row) -> String {
        let values: Vec<String> = columns
            .iter()
            .map(|c| self.formatter().format_untyped(&row.cell(c)))
            .collect();
        format!("({})", values.join(", "))
    }

    fn pairs<'a>(&self, columns: impl Iterator<Item = &'a str>, row: &Row, separator: &str) -> String {
        columns
            .map(|c| {
                format!(
                    "{} = {}",
                    self.config().column(c),
                    self.formatter().format_untyped(&row.cell(c))
                )
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}
