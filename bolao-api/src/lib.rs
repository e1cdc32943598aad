//! # bolao-api
//!
//! The persisted data model of the prediction pool system: the pool header, the
//! round rows a plan materializes into, and the preview summary configuration
//! wizards render. The engine itself lives in `bolao-core`; this crate defines the
//! exact shapes the persistence and UI boundaries exchange.

pub mod id;
pub mod pool;
pub mod preview;
pub mod rounds;

pub use id::PoolId;
pub use pool::{Lifecycle, NewPool, Pool};
pub use preview::StructurePreview;
pub use rounds::RoundRow;
