//! Browser bridge for `econlab_core`: page controllers, control specs and
//! chart geometry, exported through `WasmApp`.

mod app;
pub mod controls;
pub mod figure;
pub mod pages;
pub mod session;

pub use app::{App, WasmApp};
