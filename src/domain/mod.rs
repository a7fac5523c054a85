//! Domain modules split by discipline.
//! - `controls`: keyboard snapshot and viewer toggles.
//! - `presentation`: egui panels, meshes and gizmo overlays.
//! - `simulation`: physics world, scene lifecycle and the authoritative tick.

pub mod controls;
pub mod presentation;
pub mod simulation;

pub use controls::InputPlugin;
pub use presentation::UiPlugin;
pub use simulation::SimPlugin;
