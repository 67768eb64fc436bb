use eframe::egui::Ui;

use super::{ensure_finite, ChartComponent, ChartContext, OptionSet};
use crate::data::aggregate::{yearly_trend, AggregatePoint};
use crate::error::{ChartError, ControlError, SelectionError};
use crate::selection::{Selection, SelectionCoordinator, SubscriptionHandle, ALL_LABEL};
use crate::ui::{panels, plot};

const DESCRIPTION: &str =
    "This chart shows the average airline rating per year. Hover over line for more details.";

/// Partial update of the line chart controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineControls {
    pub airline: Option<Selection>,
}

/// Average overall rating per flight year for the selected airline (or all
/// airlines). Its airline dropdown writes the shared selection.
#[derive(Debug)]
pub struct LineChart {
    title: String,
    ctx: ChartContext,
    airlines: OptionSet<Selection>,
}

impl LineChart {
    pub fn new(title: impl Into<String>, ctx: ChartContext) -> Result<Self, ControlError> {
        let entries = std::iter::once((Selection::All, ALL_LABEL.to_string())).chain(
            ctx.dataset
                .airlines()
                .iter()
                .map(|a| (Selection::Airline(a.clone()), a.clone())),
        );
        let airlines = OptionSet::new(entries)?;
        Ok(LineChart {
            title: title.into(),
            ctx,
            airlines,
        })
    }

    /// Airline the trend is filtered to.
    pub fn filter(&self) -> Selection {
        self.ctx.highlight.get()
    }

    /// Aggregated view for the mirrored selection.
    pub fn view(&self) -> Vec<AggregatePoint<i32>> {
        yearly_trend(&self.ctx.dataset, &self.filter())
    }
}

impl ChartComponent for LineChart {
    type Update = LineControls;

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn attach(&self, coordinator: &SelectionCoordinator) -> SubscriptionHandle {
        self.ctx.highlight.attach(coordinator)
    }

    /// The airline filter is the shared selection, so a new value goes
    /// through the coordinator rather than into local state.
    fn on_local_control_changed(&mut self, update: LineControls) {
        let Some(airline) = update.airline else {
            return;
        };
        if !self.airlines.contains(&airline) {
            log::warn!("Line chart has no airline option {airline}");
            return;
        }
        log::debug!("Line chart airline dropdown set to {airline}");
        if let Err(e) = self.ctx.coordinator.set_selection(airline) {
            log::warn!("Ignoring airline dropdown change: {e}");
        }
    }

    fn on_user_pick(&mut self, airline: &str) -> Result<Selection, SelectionError> {
        self.ctx.pick(airline)
    }

    fn render(&mut self, ui: &mut Ui) -> Result<(), ChartError> {
        panels::chart_header(ui, &self.title, DESCRIPTION);

        let current = self.filter();
        if let Some(airline) = panels::option_combo(ui, "line_airline", "Select Airline:", &self.airlines, &current) {
            self.on_local_control_changed(LineControls {
                airline: Some(airline),
            });
        }

        let points = self.view();
        if points.is_empty() {
            panels::empty_state(ui);
            return Ok(());
        }
        for p in &points {
            ensure_finite("line chart", p.key, p.value)?;
        }
        plot::line_plot(ui, &points);
        Ok(())
    }
}
