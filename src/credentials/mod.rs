mod slot;
mod snapshot;
mod store;

pub use slot::{FileSlot, MemorySlot, TokenSlot};
pub use snapshot::TokenSnapshot;
pub use store::CredentialStore;
