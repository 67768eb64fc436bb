use eframe::egui;
use egui_extras::{Size, StripBuilder};

use crate::state::Dashboard;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AirlineDashApp {
    pub dashboard: Dashboard,
    header: String,
}

impl AirlineDashApp {
    pub fn new(dashboard: Dashboard, header: impl Into<String>) -> Self {
        Self {
            dashboard,
            header: header.into(),
        }
    }
}

impl eframe::App for AirlineDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: header and selection ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.header, &self.dashboard);
        });

        // ---- Bottom panel: data source ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Central panel: the three linked charts ----
        let dashboard = &mut self.dashboard;
        egui::CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .sizes(Size::remainder(), 3)
                .horizontal(|mut strip| {
                    strip.cell(|ui| dashboard.bar.show(ui));
                    strip.cell(|ui| dashboard.line.show(ui));
                    strip.cell(|ui| dashboard.heatmap.show(ui));
                });
        });
    }
}
