//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::SelectorFileConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SelectorFileConfig, ConfigError> {
    let config: SelectorFileConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SelectorFileConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const SAMPLE: &str = r#"
        [observability]
        log_level = "debug"

        [[groups]]
        name = "upstream"

        [groups.selector]
        strategy = "lc"
        max_fails = 3
        fail_timeout = "1m30s"

        [groups.selector.health_check]
        enabled = true
        type = "http"
        path = "/healthz"
        expect_status = 204

        [[groups.nodes]]
        name = "a"
        address = "127.0.0.1:9001"
        metadata = { weight = 2 }

        [[groups.nodes]]
        name = "b"
        address = "127.0.0.1:9002"
        metadata = { backup = true, "fail-timeout" = "5s" }
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.groups.len(), 1);

        let group = &config.groups[0];
        assert_eq!(group.selector.strategy, "lc");
        assert_eq!(group.selector.max_fails, 3);
        assert_eq!(group.selector.fail_timeout, Duration::from_secs(90));
        assert!(group.selector.health_check.enabled);
        assert_eq!(group.selector.health_check.check_type, "http");
        assert_eq!(group.selector.health_check.path, "/healthz");
        assert_eq!(group.selector.health_check.expect_status, 204);
        // untouched fields keep their defaults
        assert_eq!(group.selector.health_check.interval_secs, 30);
        assert_eq!(group.nodes[0].metadata.get_int("weight"), 2);
        assert!(group.nodes[1].metadata.get_bool("backup"));
    }

    #[test]
    fn test_minimal_group_uses_defaults() {
        let config = parse_config(
            r#"
            [[groups]]
            name = "g"
            nodes = [{ name = "n", address = "10.0.0.1:80" }]
            "#,
        )
        .unwrap();
        let selector = &config.groups[0].selector;
        assert_eq!(selector.strategy, "round");
        assert_eq!(selector.max_fails, 1);
        assert_eq!(selector.fail_timeout, Duration::from_secs(10));
        assert!(!selector.health_check.enabled);
    }

    #[test]
    fn test_fail_timeout_forms() {
        let parse = |line: &str| {
            let text = format!(
                "[[groups]]\nname = \"g\"\nnodes = [{{ name = \"n\", address = \"a:1\" }}]\n\
                 [groups.selector]\n{}\n",
                line
            );
            parse_config(&text).map(|c| c.groups[0].selector.fail_timeout)
        };

        assert_eq!(
            parse("fail_timeout = \"500ms\"").unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(parse("fail_timeout = 2.5").unwrap(), Duration::from_millis(2500));
        assert_eq!(parse("fail_timeout_secs = 20").unwrap(), Duration::from_secs(20));
        assert_eq!(parse("fail_timeout = -3").unwrap(), Duration::ZERO);
        assert!(matches!(
            parse("fail_timeout = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[[groups]\nname = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_is_reported() {
        let err = parse_config(
            r#"
            [[groups]]
            name = "empty"
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.groups[0].nodes.len(), 2);

        let missing = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
