use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key under [`SecretsManagerConfig::extra`] holding the local data directory.
pub const PATH_KEY: &str = "path";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretsManagerType {
    #[default]
    Local,
    InMemory,
    HashicorpVault,
    AwsSsm,
    GcpSsm,
}

impl fmt::Display for SecretsManagerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SecretsManagerType::Local => "local",
            SecretsManagerType::InMemory => "in-memory",
            SecretsManagerType::HashicorpVault => "hashicorp-vault",
            SecretsManagerType::AwsSsm => "aws-ssm",
            SecretsManagerType::GcpSsm => "gcp-ssm",
        };
        f.write_str(name)
    }
}

/// Backend selection, as read from the node's secrets config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsManagerConfig {
    #[serde(rename = "type")]
    pub kind: SecretsManagerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl SecretsManagerConfig {
    /// Local backend rooted at `path`.
    pub fn local(path: impl Into<String>) -> Self {
        let mut extra = BTreeMap::new();
        extra.insert(PATH_KEY.to_string(), path.into());
        Self {
            kind: SecretsManagerType::Local,
            extra,
            ..Self::default()
        }
    }
}
