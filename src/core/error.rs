use thiserror::Error;

/// Result type alias for routing operations
pub type RouterResult<T> = Result<T, RouterError>;

/// Error type for rule registration, matching and controller resolution.
///
/// Configuration failures surface at startup; everything else is a
/// per-request outcome the caller maps onto an HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouterError {
    /// The route registration table is empty or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A route pattern could not be compiled
    #[error("Invalid route pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// No registered rule matched the request
    #[error("No route matched {method} '{request}'")]
    NoMatch { method: String, request: String },

    /// A resolved handler path carried no module segment
    #[error("Handler '{handler}' has no module segment")]
    MissingModule { handler: String },

    /// Neither the direct nor the nested index controller exists
    #[error("No index controller exists for '{controller}'")]
    ControllerNotFound { controller: String },

    /// The per-action controller does not exist
    #[error("No action controller exists for '{controller}'")]
    ActionControllerNotFound { controller: String },

    /// The module-level index controller does not exist
    #[error("No module index controller exists for '{controller}'")]
    ModuleControllerNotFound { controller: String },
}

impl RouterError {
    /// HTTP status the host should answer with.
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() { 404 } else { 500 }
    }

    /// True for outcomes that map to a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RouterError::NoMatch { .. }
                | RouterError::ControllerNotFound { .. }
                | RouterError::ActionControllerNotFound { .. }
                | RouterError::ModuleControllerNotFound { .. }
        )
    }

    /// True for errors that must abort startup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RouterError::Configuration(_)
                | RouterError::InvalidPattern { .. }
                | RouterError::MissingModule { .. }
        )
    }

    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::Configuration(_) => "configuration",
            RouterError::InvalidPattern { .. } => "invalid_pattern",
            RouterError::NoMatch { .. } => "no_match",
            RouterError::MissingModule { .. } => "missing_module",
            RouterError::ControllerNotFound { .. } => "controller_not_found",
            RouterError::ActionControllerNotFound { .. } => "action_controller_not_found",
            RouterError::ModuleControllerNotFound { .. } => "module_controller_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_family_maps_to_404() {
        let errors = [
            RouterError::NoMatch {
                method: "get".to_string(),
                request: "missing".to_string(),
            },
            RouterError::ControllerNotFound {
                controller: "App\\Controller\\About\\IndexController".to_string(),
            },
            RouterError::ActionControllerNotFound {
                controller: "App\\Controller\\Shop\\Widgets\\ViewController".to_string(),
            },
            RouterError::ModuleControllerNotFound {
                controller: "App\\Controller\\Shop\\IndexController".to_string(),
            },
        ];

        for error in errors {
            assert_eq!(error.status_code(), 404);
            assert!(!error.is_configuration());
        }
    }

    #[test]
    fn configuration_errors_are_fatal() {
        let error = RouterError::Configuration("no rules found".to_string());
        assert!(error.is_configuration());
        assert_eq!(error.status_code(), 500);
        assert_eq!(error.kind(), "configuration");
    }
}
