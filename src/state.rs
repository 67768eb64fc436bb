use std::rc::Rc;

use crate::charts::{BarChart, ChartComponent, ChartContext, ChartSlot, HeatmapChart, LineChart};
use crate::data::model::Dataset;
use crate::error::ControlError;
use crate::selection::{Selection, SelectionCoordinator, SubscriptionHandle};

pub const BAR_TITLE: &str = "Cumulative Average Rating";
pub const LINE_TITLE: &str = "Average Rating Over Years";
pub const HEATMAP_TITLE: &str = "Distribution of Ratings";

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The assembled dashboard, independent of the window it is drawn in.
///
/// Owns the dataset, the selection coordinator and the three charts. The
/// charts are subscribed to the coordinator on assembly and unsubscribed on
/// teardown (or drop).
#[derive(Debug)]
pub struct Dashboard {
    dataset: Rc<Dataset>,
    coordinator: Rc<SelectionCoordinator>,
    pub bar: ChartSlot<BarChart>,
    pub line: ChartSlot<LineChart>,
    pub heatmap: ChartSlot<HeatmapChart>,
    subscriptions: Vec<SubscriptionHandle>,
}

impl Dashboard {
    /// Wire the three charts to a fresh coordinator over `dataset`.
    pub fn assemble(dataset: Dataset) -> Result<Self, ControlError> {
        let dataset = Rc::new(dataset);
        let coordinator = SelectionCoordinator::shared(dataset.airlines().iter().cloned());
        let ctx = || ChartContext::new(Rc::clone(&dataset), Rc::clone(&coordinator));

        let bar = BarChart::new(BAR_TITLE, ctx())?;
        let line = LineChart::new(LINE_TITLE, ctx())?;
        let heatmap = HeatmapChart::new(HEATMAP_TITLE, ctx());

        let subscriptions = vec![
            bar.attach(&coordinator),
            line.attach(&coordinator),
            heatmap.attach(&coordinator),
        ];

        log::info!(
            "Dashboard assembled over {} reviews, {} airlines",
            dataset.len(),
            dataset.airlines().len()
        );
        let unrated = dataset.records().iter().filter(|r| r.overall.is_none()).count();
        if unrated > 0 {
            log::warn!("{unrated} reviews have no overall rating and are left out of the heatmap");
        }

        Ok(Dashboard {
            dataset,
            coordinator,
            bar: ChartSlot::new(bar),
            line: ChartSlot::new(line),
            heatmap: ChartSlot::new(heatmap),
            subscriptions,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    pub fn selection(&self) -> Selection {
        self.coordinator.get_selection()
    }

    pub fn clear_selection(&self) {
        if let Err(e) = self.coordinator.set_selection(Selection::All) {
            log::warn!("Could not clear the selection: {e}");
        }
    }

    /// Messages of charts that stopped rendering.
    pub fn faults(&self) -> Vec<String> {
        [
            self.bar.fault().map(|e| format!("{}: {e}", self.bar.chart.title())),
            self.line.fault().map(|e| format!("{}: {e}", self.line.chart.title())),
            self.heatmap.fault().map(|e| format!("{}: {e}", self.heatmap.chart.title())),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Release the chart subscriptions. Idempotent.
    pub fn teardown(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        for handle in self.subscriptions.drain(..) {
            self.coordinator.unsubscribe(handle);
        }
        log::info!("Dashboard torn down");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.teardown();
    }
}
