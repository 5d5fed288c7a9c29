//! Generate command implementation

use crate::cli::commands::load_input;
use crate::cli::error::CliError;
use crate::config::GeneratorConfig;
use crate::export::SqlGenerator;
use crate::models::GenerationRequest;

/// Generate statements from a JSON request document
pub fn generate_from_str(content: &str, config: &GeneratorConfig) -> Result<String, CliError> {
    let request: GenerationRequest = serde_json::from_str(content)?;
    Ok(SqlGenerator::with_config(config.clone()).generate(&request)?)
}

/// Handle the generate command
pub fn handle_generate(input: &str, config: &GeneratorConfig) -> Result<String, CliError> {
    let content = load_input(input)?;
    generate_from_str(&content, config)
}
