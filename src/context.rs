use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const DEFAULT_CONTEXT_V2: &str = "https://www.w3.org/ns/credentials/v2";

/// JSON-LD context entry: a URI or an inline context definition.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Context {
    URI(String),
    Object(Map<String, Value>),
}

impl Context {
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::URI(uri) => Some(uri),
            Self::Object(_) => None,
        }
    }

    /// Whether this is one of the base contexts of the VC data model.
    pub fn is_base_context(&self) -> bool {
        matches!(self.as_uri(), Some(DEFAULT_CONTEXT | DEFAULT_CONTEXT_V2))
    }
}

impl From<&str> for Context {
    fn from(uri: &str) -> Self {
        Self::URI(uri.to_owned())
    }
}

impl From<String> for Context {
    fn from(uri: String) -> Self {
        Self::URI(uri)
    }
}
