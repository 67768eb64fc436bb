use eframe::egui::Ui;

use super::{ChartComponent, ChartContext};
use crate::data::aggregate::{rating_density, HeatCell};
use crate::error::{ChartError, SelectionError};
use crate::selection::{Selection, SelectionCoordinator, SubscriptionHandle};
use crate::ui::{panels, plot};

const DESCRIPTION: &str =
    "This heatmap shows the distribution of airline ratings. With colors indicating the number of reviews.";

/// Review counts per airline and overall rating. Has no local controls;
/// clicking a column picks that airline.
#[derive(Debug)]
pub struct HeatmapChart {
    title: String,
    ctx: ChartContext,
}

impl HeatmapChart {
    pub fn new(title: impl Into<String>, ctx: ChartContext) -> Self {
        HeatmapChart {
            title: title.into(),
            ctx,
        }
    }

    pub fn highlight(&self) -> Selection {
        self.ctx.highlight.get()
    }

    pub fn view(&self) -> Vec<HeatCell> {
        rating_density(&self.ctx.dataset)
    }

    /// Column order of the x axis.
    pub fn airlines(&self) -> Vec<String> {
        self.ctx.dataset.airlines().iter().cloned().collect()
    }
}

impl ChartComponent for HeatmapChart {
    type Update = ();

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn attach(&self, coordinator: &SelectionCoordinator) -> SubscriptionHandle {
        self.ctx.highlight.attach(coordinator)
    }

    fn on_local_control_changed(&mut self, _update: ()) {}

    fn on_user_pick(&mut self, airline: &str) -> Result<Selection, SelectionError> {
        self.ctx.pick(airline)
    }

    fn render(&mut self, ui: &mut Ui) -> Result<(), ChartError> {
        panels::chart_header(ui, &self.title, DESCRIPTION);

        let cells = self.view();
        if cells.is_empty() {
            panels::empty_state(ui);
            return Ok(());
        }
        for cell in &cells {
            if let Some(score) = cell.mean_projection {
                super::ensure_finite("heatmap", &cell.airline, score)?;
            }
        }

        if let Some(airline) = plot::heat_plot(ui, &cells, &self.airlines(), &self.highlight()) {
            if let Err(e) = self.on_user_pick(&airline) {
                log::warn!("Ignoring heatmap pick: {e}");
            }
        }
        Ok(())
    }
}
