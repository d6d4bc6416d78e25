pub mod file_store;
pub mod memory_store;
pub mod store;
pub mod token;

pub use file_store::FileTokenStore;
pub use memory_store::MemoryTokenStore;
pub use store::{CacheLookup, TokenStore};
pub use token::{AccessToken, CachedToken};
