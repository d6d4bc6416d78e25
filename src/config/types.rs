use serde::Deserialize;

use crate::config::settings::ProviderSettings;

/// ================================
/// Full configuration file
/// ================================
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: ProviderSettings,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Every field may instead come from the command line or environment.
#[derive(Deserialize, Clone, Default, PartialEq)]
pub struct CredentialsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CacheConfig {
    pub path: Option<String>,
}
