mod coordinator;
mod policy;

pub use coordinator::{RefreshCoordinator, RefreshOutcome};
pub use policy::FailedRefreshPolicy;
