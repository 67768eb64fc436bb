/// Chart components: local state, aggregation and the link to the shared
/// selection.
///
/// ```text
///   user input ──► chart ──► SelectionCoordinator::set_selection
///                                  │
///                   ┌──────────────┼──────────────┐
///                   ▼              ▼              ▼
///             bar mirror     line mirror    heatmap mirror
/// ```
///
/// Each chart keeps a [`SelectionMirror`] that its coordinator listener
/// writes into. Views are derived from dataset + local state + mirror every
/// time they are drawn.
pub mod bar;
pub mod heatmap;
pub mod line;

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use std::str::FromStr;

use eframe::egui::{RichText, Ui};
use indexmap::IndexMap;

use crate::color;
use crate::data::model::Dataset;
use crate::error::{ChartError, ControlError, SelectionError};
use crate::selection::{Selection, SelectionCoordinator, SubscriptionHandle};

pub use bar::{BarChart, BarControls};
pub use heatmap::HeatmapChart;
pub use line::{LineChart, LineControls};

// ---------------------------------------------------------------------------
// Chart contract
// ---------------------------------------------------------------------------

/// Behaviour shared by the three linked charts.
pub trait ChartComponent {
    /// Partial update of the chart's local controls.
    type Update;

    fn title(&self) -> &str;

    /// Hover text of the title.
    fn description(&self) -> &str;

    /// Subscribe the chart's highlight to `coordinator`.
    fn attach(&self, coordinator: &SelectionCoordinator) -> SubscriptionHandle;

    /// Merge `update` into local state.
    fn on_local_control_changed(&mut self, update: Self::Update);

    /// The user clicked `airline` in this chart.
    fn on_user_pick(&mut self, airline: &str) -> Result<Selection, SelectionError>;

    /// Draw title, controls and the current view.
    fn render(&mut self, ui: &mut Ui) -> Result<(), ChartError>;
}

// ---------------------------------------------------------------------------
// Selection mirror
// ---------------------------------------------------------------------------

/// A chart's copy of the last broadcast selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionMirror(Rc<RefCell<Selection>>);

impl SelectionMirror {
    pub fn get(&self) -> Selection {
        self.0.borrow().clone()
    }

    /// Keep this mirror in step with `coordinator`. The listener only copies
    /// the value; it never writes back to the coordinator.
    pub fn attach(&self, coordinator: &SelectionCoordinator) -> SubscriptionHandle {
        *self.0.borrow_mut() = coordinator.get_selection();
        let mirror = Rc::clone(&self.0);
        coordinator.subscribe(move |selection| {
            *mirror.borrow_mut() = selection.clone();
        })
    }
}

// ---------------------------------------------------------------------------
// Shared chart plumbing
// ---------------------------------------------------------------------------

/// Dataset, coordinator and highlight every chart carries.
#[derive(Debug, Clone)]
pub struct ChartContext {
    pub dataset: Rc<Dataset>,
    pub coordinator: Rc<SelectionCoordinator>,
    pub highlight: SelectionMirror,
}

impl ChartContext {
    pub fn new(dataset: Rc<Dataset>, coordinator: Rc<SelectionCoordinator>) -> Self {
        ChartContext {
            dataset,
            coordinator,
            highlight: SelectionMirror::default(),
        }
    }

    /// Toggle rule for direct picks: the current airline reverts to
    /// [`Selection::All`], any other airline becomes the selection.
    pub fn pick(&self, airline: &str) -> Result<Selection, SelectionError> {
        let next = self.coordinator.get_selection().toggled(airline);
        self.coordinator.set_selection(next.clone())?;
        Ok(next)
    }
}

/// Reject values the drawing layer cannot place.
pub(crate) fn ensure_finite(chart: &'static str, key: impl fmt::Display, value: f64) -> Result<(), ChartError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ChartError::NonFiniteValue {
            chart,
            key: key.to_string(),
            value,
        })
    }
}

// ---------------------------------------------------------------------------
// Dropdown options
// ---------------------------------------------------------------------------

/// Ordered `option → display label` mapping behind a dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet<K: Hash + Eq> {
    options: IndexMap<K, String>,
}

impl<K: Hash + Eq + Clone> OptionSet<K> {
    /// Build from `(option, label)` pairs; duplicates are rejected.
    pub fn new<L: Into<String>>(
        entries: impl IntoIterator<Item = (K, L)>,
    ) -> Result<Self, ControlError>
    where
        K: fmt::Debug,
    {
        let mut options = IndexMap::new();
        for (key, label) in entries {
            if options.contains_key(&key) {
                return Err(ControlError::DuplicateOption(format!("{key:?}")));
            }
            options.insert(key, label.into());
        }
        if options.is_empty() {
            return Err(ControlError::Empty);
        }
        Ok(OptionSet { options })
    }

    /// Build from `(id, label)` pairs whose ids must name members of the
    /// closed set `K`.
    pub fn declare(entries: &[(&str, &str)]) -> Result<Self, ControlError>
    where
        K: FromStr + fmt::Debug,
    {
        let parsed = entries
            .iter()
            .map(|(id, label)| {
                id.parse::<K>()
                    .map(|key| (key, *label))
                    .map_err(|_| ControlError::UnknownOption((*id).to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    pub fn label(&self, key: &K) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.options.contains_key(key)
    }

    /// The first declared option, used as the default.
    pub fn first(&self) -> Option<&K> {
        self.options.keys().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &str)> {
        self.options.iter().map(|(k, l)| (k, l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Fault isolation
// ---------------------------------------------------------------------------

/// A chart plus the fault that stopped it, if any. A faulted chart shows
/// its error; the others keep drawing.
#[derive(Debug)]
pub struct ChartSlot<C> {
    pub chart: C,
    fault: Option<ChartError>,
}

impl<C: ChartComponent> ChartSlot<C> {
    pub fn new(chart: C) -> Self {
        ChartSlot { chart, fault: None }
    }

    pub fn fault(&self) -> Option<&ChartError> {
        self.fault.as_ref()
    }

    pub fn show(&mut self, ui: &mut Ui) {
        if let Some(fault) = &self.fault {
            ui.heading(self.chart.title());
            ui.label(RichText::new(format!("Chart unavailable: {fault}")).color(color::ERROR));
            return;
        }
        if let Err(e) = self.chart.render(ui) {
            log::error!("{} stopped rendering: {e}", self.chart.title());
            self.fault = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::SortOrder;
    use crate::data::model::RatingCategory;

    #[test]
    fn declare_keeps_order_and_labels() {
        let set: OptionSet<SortOrder> = OptionSet::declare(&[
            ("Highest to Lowest Rating", "Best first"),
            ("Alphabetically", "A-Z"),
        ])
        .expect("valid options");
        let keys: Vec<SortOrder> = set.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, [SortOrder::HighestFirst, SortOrder::Alphabetical]);
        assert_eq!(set.label(&SortOrder::Alphabetical), Some("A-Z"));
        assert_eq!(set.first(), Some(&SortOrder::HighestFirst));
    }

    #[test]
    fn declare_rejects_ids_outside_the_closed_set() {
        let err = OptionSet::<RatingCategory>::declare(&[("Legroom", "Legroom")])
            .expect_err("unknown id");
        assert_eq!(err, ControlError::UnknownOption("Legroom".into()));
    }

    #[test]
    fn new_rejects_duplicates_and_empty_sets() {
        let dup = OptionSet::new([(1, "one"), (1, "uno")]).expect_err("duplicate");
        assert_eq!(dup, ControlError::DuplicateOption("1".into()));
        let empty = OptionSet::<u8>::new(Vec::<(u8, &str)>::new()).expect_err("empty");
        assert_eq!(empty, ControlError::Empty);
    }

    #[test]
    fn mirror_follows_broadcasts() {
        let coordinator = SelectionCoordinator::new(["X"]);
        let mirror = SelectionMirror::default();
        mirror.attach(&coordinator);
        coordinator
            .set_selection(Selection::Airline("X".into()))
            .expect("valid");
        assert_eq!(mirror.get(), Selection::Airline("X".into()));
    }

    /// Chart that counts its renders and fails them on demand.
    struct CountingChart {
        renders: usize,
        fail: bool,
    }

    impl ChartComponent for CountingChart {
        type Update = ();

        fn title(&self) -> &str {
            "Test chart"
        }

        fn description(&self) -> &str {
            ""
        }

        fn attach(&self, coordinator: &SelectionCoordinator) -> SubscriptionHandle {
            coordinator.subscribe(|_| {})
        }

        fn on_local_control_changed(&mut self, _update: ()) {}

        fn on_user_pick(&mut self, airline: &str) -> Result<Selection, SelectionError> {
            Err(SelectionError::InvalidSelectionValue(airline.to_string()))
        }

        fn render(&mut self, ui: &mut Ui) -> Result<(), ChartError> {
            self.renders += 1;
            ui.label("drawn");
            if self.fail {
                ensure_finite("test chart", "X", f64::NAN)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn render_fault_disables_only_the_failing_chart() {
        let mut broken = ChartSlot::new(CountingChart { renders: 0, fail: true });
        let mut healthy = ChartSlot::new(CountingChart { renders: 0, fail: false });
        let ctx = eframe::egui::Context::default();

        for _ in 0..3 {
            let _ = ctx.run(Default::default(), |ctx| {
                eframe::egui::CentralPanel::default().show(ctx, |ui| {
                    broken.show(ui);
                    healthy.show(ui);
                });
            });
        }

        assert!(matches!(
            broken.fault(),
            Some(ChartError::NonFiniteValue { chart: "test chart", .. })
        ));
        assert_eq!(broken.chart.renders, 1);
        assert!(healthy.fault().is_none());
        assert!(healthy.chart.renders >= 3);
    }

    #[test]
    fn non_finite_values_are_chart_errors() {
        assert!(ensure_finite("bar", "X", 3.0).is_ok());
        assert!(matches!(
            ensure_finite("bar", "X", f64::NAN),
            Err(ChartError::NonFiniteValue { chart: "bar", .. })
        ));
    }
}
