//! Audit logging exemptions

use regex::Regex;

use crate::domain::DomainError;

/// A (method, path pattern) rule that causes a request to skip audit logging
///
/// The pattern must match the whole request path, not a substring of it.
#[derive(Debug, Clone)]
pub struct LoggingExemption {
    method: String,
    pattern: Regex,
}

impl LoggingExemption {
    /// Compile an exemption. Fails on a malformed pattern.
    pub fn new(method: impl Into<String>, path_regex: impl Into<String>) -> Result<Self, DomainError> {
        let path_regex = path_regex.into();
        let pattern = Regex::new(&format!("^(?:{})$", path_regex)).map_err(|e| {
            DomainError::configuration(format!(
                "Invalid logging exemption pattern '{}': {}",
                path_regex, e
            ))
        })?;

        Ok(Self {
            method: method.into(),
            pattern,
        })
    }

    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method.eq_ignore_ascii_case(method) && self.pattern.is_match(path)
    }
}

/// Returns true if any exemption matches the request
pub fn is_exempt(method: &str, path: &str, exemptions: &[LoggingExemption]) -> bool {
    exemptions.iter().any(|exemption| exemption.matches(method, path))
}

/// Exemptions applied by the service: the version endpoint is polled by liveness checks.
pub fn default_exemptions(api_version: &str) -> Result<Vec<LoggingExemption>, DomainError> {
    Ok(vec![LoggingExemption::new(
        "GET",
        format!("^/api/{}/public/version$", regex::escape(api_version)),
    )?])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_exemption() -> LoggingExemption {
        LoggingExemption::new("GET", "^/api/v1/public/version$").unwrap()
    }

    #[test]
    fn test_version_endpoint_is_exempt() {
        let exemptions = vec![version_exemption()];
        assert!(is_exempt("GET", "/api/v1/public/version", &exemptions));
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let exemptions = vec![version_exemption()];
        assert!(is_exempt("get", "/api/v1/public/version", &exemptions));
        assert!(is_exempt("Get", "/api/v1/public/version", &exemptions));
    }

    #[test]
    fn test_other_method_is_not_exempt() {
        let exemptions = vec![version_exemption()];
        assert!(!is_exempt("POST", "/api/v1/public/version", &exemptions));
    }

    #[test]
    fn test_empty_exemptions() {
        assert!(!is_exempt("GET", "/api/v1/public/version", &[]));
    }

    #[test]
    fn test_unanchored_pattern_requires_full_match() {
        let exemptions = vec![LoggingExemption::new("GET", "/public/version").unwrap()];

        assert!(is_exempt("GET", "/public/version", &exemptions));
        assert!(!is_exempt("GET", "/api/v1/public/version", &exemptions));
        assert!(!is_exempt("GET", "/public/version/extra", &exemptions));
    }

    #[test]
    fn test_alternation_is_fully_anchored() {
        let exemptions = vec![LoggingExemption::new("GET", "/a|/b").unwrap()];

        assert!(is_exempt("GET", "/a", &exemptions));
        assert!(is_exempt("GET", "/b", &exemptions));
        assert!(!is_exempt("GET", "/a/x", &exemptions));
        assert!(!is_exempt("GET", "x/b", &exemptions));
    }

    #[test]
    fn test_any_exemption_matches() {
        let exemptions = vec![
            LoggingExemption::new("POST", "/hooks/.*").unwrap(),
            version_exemption(),
        ];

        assert!(is_exempt("POST", "/hooks/github", &exemptions));
        assert!(is_exempt("GET", "/api/v1/public/version", &exemptions));
        assert!(!is_exempt("GET", "/hooks/github", &exemptions));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = LoggingExemption::new("GET", "/api/(unclosed");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_default_exemptions_escape_version() {
        let exemptions = default_exemptions("v1.2").unwrap();

        assert!(is_exempt("GET", "/api/v1.2/public/version", &exemptions));
        assert!(!is_exempt("GET", "/api/v1x2/public/version", &exemptions));
        assert!(!is_exempt("GET", "/api/v1.2/public/health", &exemptions));
    }
}
