//! Configuration for the rewrite pipeline.

use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// Public name given to the schema root alias unless configured otherwise.
pub const DEFAULT_ROOT_NAME: &str = "Tsconfig";

/// An optional string-literal property injected into a named interface.
///
/// Rendered as `name?: "value";` and placed first in the interface body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InjectedProperty {
    /// Interface that receives the property.
    pub interface: String,
    /// Property name.
    pub name: String,
    /// String-literal type of the property.
    pub value: String,
}

impl InjectedProperty {
    /// Parse the `Interface.property=literal` form used on the command line.
    pub fn parse_spec(spec: &str) -> Option<Self> {
        let (target, value) = spec.split_once('=')?;
        let (interface, name) = target.split_once('.')?;
        if interface.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            interface: interface.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Options for the rewrite pipeline.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `root-name`, `merge-root-unions`).
/// Missing fields fall back to [`PipelineOptions::default`], so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PipelineOptions {
    /// Identifier given to the root type alias. Default: `Tsconfig`.
    pub root_name: String,
    /// Name of the alias to treat as the root. Default: the first top-level
    /// type alias in the file.
    pub root_alias: Option<String>,
    /// Property injected into an interface during root renaming.
    pub inject_property: Option<InjectedProperty>,
    /// Rewrite every union under the root alias into an intersection.
    pub merge_root_unions: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            root_alias: None,
            inject_property: None,
            merge_root_unions: false,
        }
    }
}

impl PipelineOptions {
    /// Load options from a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        Ok(serde_json::from_str(json)?)
    }
}
