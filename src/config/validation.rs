use eyre::Result;

use crate::{
    config::models::{DefaultsConfig, GuardsConfig, NamingConfig, RouterConfig},
    core::rule::RuleCompiler,
};

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid route '{pattern}': {message}")]
    InvalidRoute { pattern: String, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Router configuration validator
pub struct RouterConfigValidator;

impl RouterConfigValidator {
    /// Validate the entire router configuration, reporting every problem at once
    pub fn validate(config: &RouterConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_http_path(&config.http_path) {
            errors.push(e);
        }

        errors.extend(Self::validate_defaults(&config.defaults));
        errors.extend(Self::validate_naming(&config.naming));

        if let Err(e) = Self::validate_guards(&config.guards) {
            errors.push(e);
        }

        if config.routes.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "routes".to_string(),
            });
        } else {
            for (pattern, entry) in config.routes.iter() {
                if let Err(e) = RuleCompiler::compile(pattern, entry) {
                    errors.push(ValidationError::InvalidRoute {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    /// Base URL must be absolute http(s) with a host and end with `/`
    fn validate_http_path(http_path: &str) -> ValidationResult<()> {
        if http_path.is_empty() {
            return Err(ValidationError::MissingField {
                field: "http_path".to_string(),
            });
        }

        match url::Url::parse(http_path) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ValidationError::InvalidField {
                        field: "http_path".to_string(),
                        message: format!(
                            "URL scheme must be 'http' or 'https', got '{}'",
                            url.scheme()
                        ),
                    });
                }

                if url.host().is_none() {
                    return Err(ValidationError::InvalidField {
                        field: "http_path".to_string(),
                        message: "URL must have a valid host".to_string(),
                    });
                }

                if !http_path.ends_with('/') {
                    return Err(ValidationError::InvalidField {
                        field: "http_path".to_string(),
                        message: "Base URL must end with '/'".to_string(),
                    });
                }

                Ok(())
            }
            Err(e) => Err(ValidationError::InvalidField {
                field: "http_path".to_string(),
                message: format!("Invalid URL format: {e}"),
            }),
        }
    }

    fn validate_defaults(defaults: &DefaultsConfig) -> Vec<ValidationError> {
        [
            ("defaults.module", &defaults.module),
            ("defaults.controller", &defaults.controller),
            ("defaults.action", &defaults.action),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            let message = if value.is_empty() {
                "must not be empty"
            } else if value.contains('/') {
                "must be a single path segment"
            } else if value.to_lowercase() != *value {
                "must be lowercase"
            } else {
                return None;
            };
            Some(ValidationError::InvalidField {
                field: field.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
    }

    fn validate_naming(naming: &NamingConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if naming.separator.is_empty() {
            errors.push(ValidationError::InvalidField {
                field: "naming.separator".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if naming.controller_suffix.is_empty() {
            errors.push(ValidationError::InvalidField {
                field: "naming.controller_suffix".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        errors
    }

    fn validate_guards(guards: &GuardsConfig) -> ValidationResult<()> {
        if !Self::is_valid_redirect_status_code(guards.status_code) {
            return Err(ValidationError::InvalidField {
                field: "guards.status_code".to_string(),
                message: format!(
                    "Status code {} is not a valid redirect code. Use 301, 302, 307, or 308",
                    guards.status_code
                ),
            });
        }
        Ok(())
    }

    fn is_valid_redirect_status_code(code: u16) -> bool {
        matches!(code, 301 | 302 | 307 | 308)
    }

    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        if errors.is_empty() {
            return "No errors".to_string();
        }

        if errors.len() == 1 {
            return errors[0].to_string();
        }

        let mut message = format!("Found {} validation errors:\n", errors.len());
        for (i, error) in errors.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i + 1, error));
        }
        message
    }
}
