//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::candidate::Metadata;
use crate::health::checker::{DEFAULT_EXPECT_STATUS, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
use crate::selector::{DEFAULT_FAIL_TIMEOUT, DEFAULT_MAX_FAILS};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SelectorFileConfig {
    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Node groups, each with its own selector.
    pub groups: Vec<GroupConfig>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json: bool,

    /// Prometheus endpoint bind address; disabled when absent.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_address: None,
        }
    }
}

/// A named set of nodes sharing one selector.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// Group identifier.
    pub name: String,

    /// Selection settings for this group.
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Member nodes.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Selector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Strategy name or alias (`round`, `rr`, `random`, `fifo`, `hash`,
    /// `leastconn`, `leastlatency`, ...). Unknown names use round-robin.
    pub strategy: String,

    /// Failures before a node is excluded (default: 1).
    pub max_fails: i64,

    /// Cool-down after the last failure (default: 10s). Accepts seconds as a
    /// number or a string with units (`"500ms"`, `"1m30s"`).
    #[serde(alias = "fail_timeout_secs", with = "duration_value")]
    pub fail_timeout: Duration,

    /// Active health checking.
    pub health_check: HealthCheckConfig,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            strategy: "round".to_string(),
            max_fails: DEFAULT_MAX_FAILS,
            fail_timeout: DEFAULT_FAIL_TIMEOUT,
            health_check: HealthCheckConfig::default(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable active health checks. Also switches the liveness filter from
    /// fail/cool-down to health-check mode.
    pub enabled: bool,

    /// Probe type: `tcp` or `http`.
    #[serde(rename = "type")]
    pub check_type: String,

    /// Health check interval in seconds.
    pub interval_secs: u64,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// Path to probe for HTTP health checks.
    pub path: String,

    /// Expected HTTP status; 0 accepts any 2xx/3xx.
    pub expect_status: u16,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            check_type: "tcp".to_string(),
            interval_secs: DEFAULT_INTERVAL.as_secs(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            path: "/".to_string(),
            expect_status: DEFAULT_EXPECT_STATUS,
        }
    }
}

/// A single node.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Node identifier, unique within its group.
    pub name: String,

    /// Dialable address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Free-form metadata: `weight`, `backup`, `max-fails`, `fail-timeout`.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Serde adapter for durations written as seconds or unit strings.
mod duration_value {
    use std::time::Duration;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::candidate::MetadataValue;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let text = if d.subsec_nanos() == 0 {
            format!("{}s", d.as_secs())
        } else if d.subsec_nanos() % 1_000_000 == 0 {
            format!("{}ms", d.as_millis())
        } else {
            format!("{}ns", d.as_nanos())
        };
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let value = MetadataValue::deserialize(deserializer)?;
        value
            .as_duration()
            .ok_or_else(|| D::Error::custom(format!("invalid duration: {:?}", value)))
    }
}
