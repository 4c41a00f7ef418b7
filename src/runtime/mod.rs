//! Runtime module
//!
//! Task and stream handles, plus the supervised spawner used for side work.

pub mod async_task;

pub use async_task::{AsyncStream, AsyncTask, spawn_detached};
