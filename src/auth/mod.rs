/// Auth module
///
/// Owns the single Zoho OAuth bearer credential: refresh-grant issuance,
/// expiry policy, coalesced refresh, and persistence across restarts.
pub mod credential;
pub mod manager;
pub mod store;

pub use credential::Credential;
pub use manager::CredentialManager;
