pub mod oauth2;

pub use oauth2::{ClientCredentials, OAuth2Source, TokenResponse};
