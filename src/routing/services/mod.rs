//! Application services for model routing.

mod policy;
mod router;

pub use policy::{DEFAULT_MAX_RETRIES, RoutingPolicy};
pub use router::ModelRouter;
