// Application layer - use cases and orchestration.
// Aggregation lives in `domain`; this layer owns state, persistence and gating.

pub mod error;
pub mod service;
pub mod settings;
pub mod store;

pub use error::*;
pub use service::*;
pub use settings::*;
pub use store::*;
