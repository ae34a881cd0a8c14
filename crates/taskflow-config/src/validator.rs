//! Configuration validation.

use crate::schema::Config;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const KV_BACKENDS: [&str; 1] = ["memory"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_logging(config, &mut result);
        Self::validate_runner(config, &mut result);
        Self::validate_integrations(config, &mut result);

        result
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', expected one of {}",
                    config.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        if config.logging.file && config.logging.dir.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.dir",
                "dir cannot be empty when file logging is enabled",
            ));
        }
    }

    fn validate_runner(config: &Config, result: &mut ValidationResult) {
        if config.runner.event_buffer == 0 {
            result.add_error(ValidationError::new(
                "runner.event_buffer",
                "event_buffer must be greater than 0",
            ));
        }

        match config.runner.step_timeout_seconds {
            Some(0) => result.add_error(ValidationError::new(
                "runner.step_timeout_seconds",
                "step_timeout_seconds must be greater than 0",
            )),
            Some(secs) if secs > 3600 => result.add_warning(ValidationWarning::new(
                "runner.step_timeout_seconds",
                "step_timeout_seconds is very high (>3600), a stuck step will hold the run",
            )),
            _ => {}
        }
    }

    fn validate_integrations(config: &Config, result: &mut ValidationResult) {
        let http = &config.integrations.http;
        if http.enabled {
            if http.timeout_seconds == 0 {
                result.add_error(ValidationError::new(
                    "integrations.http.timeout_seconds",
                    "timeout_seconds must be greater than 0",
                ));
            } else if http.timeout_seconds > 300 {
                result.add_warning(ValidationWarning::new(
                    "integrations.http.timeout_seconds",
                    "timeout_seconds is above 300",
                ));
            }
            if http.user_agent.trim().is_empty() {
                result.add_warning(ValidationWarning::new(
                    "integrations.http.user_agent",
                    "Empty user_agent, some APIs reject such requests",
                ));
            }
        }

        let kv = &config.integrations.kv;
        if kv.enabled && !KV_BACKENDS.contains(&kv.backend.as_str()) {
            result.add_error(ValidationError::new(
                "integrations.kv.backend",
                format!("Unsupported backend '{}'", kv.backend),
            ));
        }

        let crm = &config.integrations.crm;
        if crm.enabled {
            result.add_warning(ValidationWarning::new(
                "integrations.crm.enabled",
                format!(
                    "No built-in '{}' client; CRM tasks stay unavailable unless a client is supplied",
                    crm.provider
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
