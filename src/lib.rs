//! Gridfall (workspace facade crate).
//!
//! This package keeps the `gridfall::{core,engine,types}` public API stable
//! while the implementation lives in dedicated crates under `crates/`.

pub use gridfall_core as core;
pub use gridfall_engine as engine;
pub use gridfall_types as types;
