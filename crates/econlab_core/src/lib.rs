//! The `econlab_core` crate is the numeric engine behind the EconLab pages.
//! Everything here is a pure, deterministic function of plain scalar inputs.
//!
//! Key components:
//! - **Curves**: `LinearCurve` (`P = a + b·Q`), intersection, shifts and schedule fitting.
//! - **Viewport**: clipping infinite lines to the box on screen.
//! - **Surplus / Welfare**: surplus triangles, deadweight-loss wedges, externalities and
//!   price controls.
//! - **Budget / Production**: budget lines, production-possibility frontiers and
//!   comparative advantage.
//! - **Models**: Solow, Phillips curve, IS-LM, AD-AS, HANK teaser, the three-equation NK
//!   model and fiscal dynamics.
//! - **Solvers**: the `PeriodMap` trait and the `DiscreteMap` stepper the recurrences run on.
pub mod budget;
pub mod curve;
pub mod error;
pub mod grid;
pub mod models;
pub mod production;
pub mod solvers;
pub mod surplus;
pub mod viewport;
pub mod welfare;

pub use curve::{intersect, LinearCurve, Point2D};
pub use error::ModelError;
pub use viewport::{clip_to_box, Segment, Viewport};
