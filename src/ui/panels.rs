use eframe::egui::{self, RichText, Ui};

use crate::charts::OptionSet;
use crate::color;
use crate::selection::Selection;
use crate::state::Dashboard;

// ---------------------------------------------------------------------------
// Chart title and controls
// ---------------------------------------------------------------------------

/// Chart title; hovering it shows the chart description.
pub fn chart_header(ui: &mut Ui, title: &str, description: &str) {
    ui.heading(title).on_hover_text(description);
}

/// Labelled dropdown over `options`. Returns the newly picked option.
pub fn option_combo<K>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &OptionSet<K>,
    current: &K,
) -> Option<K>
where
    K: std::hash::Hash + Eq + Clone,
{
    let mut picked = None;
    ui.label(RichText::new(label).small());
    egui::ComboBox::from_id_salt(id)
        .selected_text(options.label(current).unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for (key, text) in options.iter() {
                if ui.selectable_label(key == current, text).clicked() && key != current {
                    picked = Some(key.clone());
                }
            }
        });
    picked
}

/// Shown when an aggregation produced no groups.
pub fn empty_state(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label("No reviews match the current selection.");
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the header: dashboard title, dataset size and the shared
/// selection.
pub fn top_bar(ui: &mut Ui, header: &str, dashboard: &Dashboard) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(header).strong());
    });

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(format!(
            "{} reviews of {} airlines",
            dashboard.dataset().len(),
            dashboard.dataset().airlines().len()
        ));

        ui.separator();

        let selection = dashboard.selection();
        ui.label(format!("Selected airline: {selection}"));
        if ui
            .add_enabled(selection != Selection::All, egui::Button::new("Clear selection"))
            .clicked()
        {
            dashboard.clear_selection();
        }

        for fault in dashboard.faults() {
            ui.separator();
            ui.label(RichText::new(fault).color(color::ERROR));
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Data: Airline Reviews Dataset from airlinequality.com").small());
    });
}
