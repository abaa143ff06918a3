//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check group and node identity (non-empty, unique names)
//! - Check every group can select something
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Numeric thresholds are never rejected; non-positive values are coerced
//!   to defaults where they are used

use std::collections::HashSet;

use crate::config::schema::SelectorFileConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("group #{index} has an empty name")]
    EmptyGroupName { index: usize },

    #[error("group '{name}' is defined more than once")]
    DuplicateGroup { name: String },

    #[error("group '{group}' has no nodes")]
    EmptyGroup { group: String },

    #[error("node #{index} in group '{group}' has an empty name")]
    EmptyNodeName { group: String, index: usize },

    #[error("node '{name}' appears twice in group '{group}'")]
    DuplicateNode { group: String, name: String },

    #[error("node '{node}' in group '{group}' has no address")]
    EmptyAddress { group: String, node: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SelectorFileConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut groups = HashSet::new();

    for (index, group) in config.groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            errors.push(ValidationError::EmptyGroupName { index });
        } else if !groups.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup {
                name: group.name.clone(),
            });
        }

        if group.nodes.is_empty() {
            errors.push(ValidationError::EmptyGroup {
                group: group.name.clone(),
            });
        }

        let mut nodes = HashSet::new();
        for (index, node) in group.nodes.iter().enumerate() {
            if node.name.trim().is_empty() {
                errors.push(ValidationError::EmptyNodeName {
                    group: group.name.clone(),
                    index,
                });
            } else if !nodes.insert(node.name.as_str()) {
                errors.push(ValidationError::DuplicateNode {
                    group: group.name.clone(),
                    name: node.name.clone(),
                });
            }

            if node.address.trim().is_empty() {
                errors.push(ValidationError::EmptyAddress {
                    group: group.name.clone(),
                    node: node.name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
