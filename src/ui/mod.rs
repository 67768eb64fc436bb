//! Drawing layer: egui panels and egui_plot charts. Holds no state.

pub mod panels;
pub mod plot;
