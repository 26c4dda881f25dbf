//! Headless paddling scenarios.
//!
//! Drives the paddle controller with a scripted paddler against an analytic
//! scene and Gerstner water, moving a planar hull with the resulting forces.

pub mod hull;
pub mod init;
pub mod report;
pub mod scenario;
pub mod script;

pub use init::{build_app, run, SimSettings};
pub use report::SimReport;
pub use scenario::{load_scenario, Scenario};
