//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SelectorFileConfig (validated, immutable)
//!     → build.rs (strategy + filters → Selector, health checker)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Numeric misconfiguration is coerced, never rejected

pub mod build;
pub mod loader;
pub mod schema;
pub mod validation;

pub use build::{build_health_checker, build_selector, parse_strategy};
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    GroupConfig, HealthCheckConfig, NodeConfig, ObservabilityConfig, SelectorConfig,
    SelectorFileConfig,
};
