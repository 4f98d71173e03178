//! Application layer: the load orchestrator and the declarative job
//! document the CLI feeds into it.

pub mod job;
pub mod loader;

pub use job::LoadJob;
pub use loader::SqlLoader;
