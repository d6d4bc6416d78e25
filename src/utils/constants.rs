//! Shared constants and invariants

pub const DEFAULT_TOKEN_URL: &str = "https://auth.apps.paloaltonetworks.com/oauth2/access_token";
pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 180;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const TSG_SCOPE_PREFIX: &str = "tsg_id:";
