//! Tool input validation.
//!
//! Pure domain logic that validates a call's arguments against the
//! descriptor's parameter definitions before any policy check runs.
//! No I/O operations.

use super::call::ToolCall;
use super::descriptor::ToolDescriptor;

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its descriptor
    fn validate(&self, call: &ToolCall, descriptor: &ToolDescriptor) -> Result<(), String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, descriptor: &ToolDescriptor) -> Result<(), String> {
        // Check that all required parameters are present
        for param in &descriptor.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, descriptor.id
                ));
            }
        }

        // Check that all provided arguments are valid parameters
        let valid_params: std::collections::HashSet<&str> = descriptor
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        for arg_name in call.arguments.keys() {
            if !valid_params.contains(arg_name.as_str()) {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, descriptor.id
                ));
            }
        }

        Ok(())
    }
}
