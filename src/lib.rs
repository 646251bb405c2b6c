mod client;
pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod errors;
pub mod navigation;
pub mod refresh;
pub mod request_context;
pub mod retry;
pub mod telemetry;
mod types;
pub mod wallet;

pub use client::ApiSession;
pub use config::{Config, ConfigLocation};
pub use credentials::{CredentialStore, FileSlot, MemorySlot, TokenSlot, TokenSnapshot};
pub use endpoint::BaseUrl;
pub use errors::Error;
pub use navigation::{ChannelNavigator, LogNavigator, Navigator};
pub use refresh::FailedRefreshPolicy;
pub use request_context::RequestDescriptor;
pub use types::{AccessToken, ApiResponse, TOKEN_EXPIRED};
pub use wallet::WalletApi;

#[cfg(test)]
mod tests;
