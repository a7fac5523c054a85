mod diagnostics_panel;
mod help_panel;
mod scene_panel;

pub use diagnostics_panel::show_diagnostics_panel;
pub use help_panel::show_help_panel;
pub use scene_panel::{show_scene_panel, SecondLawForm};
