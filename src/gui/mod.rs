// gui/mod.rs
// GUI module root for fight-stats-analyzer

pub mod util;
mod components {
    pub mod actions;
    pub mod capture_panel;
    pub mod header;
    pub mod parameters;
    pub mod results;
    pub mod status_badges;
    pub mod template_preview;
}
pub mod dioxus_app; // main app
pub mod hooks;
