//! Output formatting for token streams and generated checks
//!
//! Rendering helpers used by the command-line driver to inspect a pipeline
//! stage: a compact "simple" form built from the Display impls, and JSON via
//! serde for tooling.

use crate::passlang::interpreter::Check;
use crate::passlang::lexer::Token;
use std::fmt;

/// The output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
}

impl OutputFormat {
    /// Parse a format string given on the command line.
    pub fn from_string(format: &str) -> Result<Self, FormatError> {
        match format {
            "simple" => Ok(OutputFormat::Simple),
            "json" => Ok(OutputFormat::Json),
            other => Err(FormatError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors that can occur while rendering output
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    UnknownFormat(String),
    Serialization(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(format) => write!(f, "unknown format: {}", format),
            FormatError::Serialization(msg) => write!(f, "serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

/// Render a token stream in the requested format.
pub fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for token in tokens {
                result.push_str(&token.to_string());
            }
            Ok(result)
        }
        OutputFormat::Json => serde_json::to_string_pretty(tokens)
            .map_err(|e| FormatError::Serialization(e.to_string())),
    }
}

/// Render a list of generated checks in the requested format.
pub fn format_checks(checks: &[Check], format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Simple => {
            let rendered: Vec<String> = checks.iter().map(Check::to_string).collect();
            Ok(rendered.join(" "))
        }
        OutputFormat::Json => serde_json::to_string_pretty(checks)
            .map_err(|e| FormatError::Serialization(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passlang::lexer::tokenize;

    #[test]
    fn test_simple_token_formatting() {
        let tokens = tokenize("1.2");
        assert_eq!(
            format_tokens(&tokens, OutputFormat::Simple).unwrap(),
            "<operand:1><check-separator><operand:2><end>"
        );
    }

    #[test]
    fn test_json_token_formatting() {
        let tokens = tokenize("n");
        let json = format_tokens(&tokens, OutputFormat::Json).unwrap();
        assert!(json.contains("\"NumOfChecksVar\""));
        assert!(json.contains("\"End\""));
    }

    #[test]
    fn test_simple_check_formatting() {
        let checks = vec![
            Check { world: 0, x: 10, y: 20 },
            Check { world: 1, x: 30, y: 40 },
        ];
        assert_eq!(
            format_checks(&checks, OutputFormat::Simple).unwrap(),
            "0.10.20 1.30.40"
        );
    }

    #[test]
    fn test_unknown_format() {
        assert_eq!(
            OutputFormat::from_string("xml"),
            Err(FormatError::UnknownFormat("xml".to_string()))
        );
    }
}
