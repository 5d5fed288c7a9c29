//! CLI command handlers
//!
//! Handlers return the text to print so they can be exercised without a
//! terminal.

pub mod configs;
pub mod generate;
pub mod generic;
pub mod records;

use crate::cli::error::CliError;
use std::io::Read;
use std::path::PathBuf;

/// Load input content from a file, or from stdin when `input` is `-`
pub fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}
