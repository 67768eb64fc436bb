use eframe::egui::Ui;

use super::{ensure_finite, ChartComponent, ChartContext, OptionSet};
use crate::data::aggregate::{category_means, AggregatePoint, SortOrder};
use crate::data::model::RatingCategory;
use crate::error::{ChartError, ControlError, SelectionError};
use crate::selection::{Selection, SelectionCoordinator, SubscriptionHandle};
use crate::ui::{panels, plot};

const DESCRIPTION: &str =
    "This chart shows the average airline ratings across various categories. Hover over bars for more details.";

/// Partial update of the bar chart controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarControls {
    pub category: Option<RatingCategory>,
    pub sort_order: Option<SortOrder>,
}

/// Per-airline average of one rating category. Clicking a bar selects that
/// airline.
#[derive(Debug)]
pub struct BarChart {
    title: String,
    ctx: ChartContext,
    categories: OptionSet<RatingCategory>,
    sort_orders: OptionSet<SortOrder>,
    category: RatingCategory,
    sort_order: SortOrder,
}

impl BarChart {
    pub fn new(title: impl Into<String>, ctx: ChartContext) -> Result<Self, ControlError> {
        // Overall first, the rest alphabetically by label.
        let mut detailed = RatingCategory::DETAILED;
        detailed.sort_by_key(|c| c.label());
        let category_entries: Vec<(&str, &str)> = std::iter::once(RatingCategory::Overall)
            .chain(detailed)
            .map(|c| (c.column(), c.label()))
            .collect();
        let categories = OptionSet::declare(&category_entries)?;

        let sort_orders = OptionSet::declare(&[
            ("Alphabetically", "Alphabetically"),
            ("Highest to Lowest Rating", "Highest to Lowest Rating"),
        ])?;

        let category = *categories.first().ok_or(ControlError::Empty)?;
        let sort_order = *sort_orders.first().ok_or(ControlError::Empty)?;
        Ok(BarChart {
            title: title.into(),
            ctx,
            categories,
            sort_orders,
            category,
            sort_order,
        })
    }

    pub fn category(&self) -> RatingCategory {
        self.category
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Airline currently highlighted.
    pub fn highlight(&self) -> Selection {
        self.ctx.highlight.get()
    }

    /// Aggregated view for the current category and order.
    pub fn view(&self) -> Vec<AggregatePoint<String>> {
        category_means(&self.ctx.dataset, self.category, self.sort_order)
    }
}

impl ChartComponent for BarChart {
    type Update = BarControls;

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn attach(&self, coordinator: &SelectionCoordinator) -> SubscriptionHandle {
        self.ctx.highlight.attach(coordinator)
    }

    fn on_local_control_changed(&mut self, update: BarControls) {
        if let Some(category) = update.category.filter(|c| self.categories.contains(c)) {
            self.category = category;
        }
        if let Some(order) = update.sort_order.filter(|o| self.sort_orders.contains(o)) {
            self.sort_order = order;
        }
        log::debug!("Bar chart showing {} sorted {}", self.category, self.sort_order.id());
    }

    fn on_user_pick(&mut self, airline: &str) -> Result<Selection, SelectionError> {
        self.ctx.pick(airline)
    }

    fn render(&mut self, ui: &mut Ui) -> Result<(), ChartError> {
        panels::chart_header(ui, &self.title, DESCRIPTION);

        let update = BarControls {
            category: panels::option_combo(ui, "bar_category", "Select Category:", &self.categories, &self.category),
            sort_order: panels::option_combo(ui, "bar_sort", "Sort By:", &self.sort_orders, &self.sort_order),
        };
        if update != BarControls::default() {
            self.on_local_control_changed(update);
        }

        let rows = self.view();
        if rows.is_empty() {
            panels::empty_state(ui);
            return Ok(());
        }
        for row in &rows {
            ensure_finite("bar chart", &row.key, row.value)?;
        }

        if let Some(airline) = plot::bar_plot(ui, &rows, &self.highlight(), self.category.label()) {
            if let Err(e) = self.on_user_pick(&airline) {
                log::warn!("Ignoring bar pick: {e}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::data::model::Dataset;

    fn chart() -> BarChart {
        let dataset = Rc::new(Dataset::default());
        let coordinator = SelectionCoordinator::shared(Vec::<String>::new());
        BarChart::new("Bars", ChartContext::new(dataset, coordinator)).expect("chart")
    }

    #[test]
    fn defaults_to_overall_alphabetical() {
        let c = chart();
        assert_eq!(c.category(), RatingCategory::Overall);
        assert_eq!(c.sort_order(), SortOrder::Alphabetical);
    }

    #[test]
    fn category_options_list_overall_first_then_by_label() {
        let c = chart();
        let labels: Vec<&str> = c.categories.iter().map(|(_, l)| l).collect();
        assert_eq!(
            labels,
            [
                "Overall Rating",
                "Cabin Staff Service",
                "Food & Beverages",
                "Ground Service",
                "Inflight Entertainment",
                "Seat Comfort",
                "Value For Money",
                "Wifi & Connectivity",
            ]
        );
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let mut c = chart();
        c.on_local_control_changed(BarControls {
            sort_order: Some(SortOrder::HighestFirst),
            ..Default::default()
        });
        c.on_local_control_changed(BarControls {
            category: Some(RatingCategory::GroundService),
            ..Default::default()
        });
        assert_eq!(c.category(), RatingCategory::GroundService);
        assert_eq!(c.sort_order(), SortOrder::HighestFirst);
    }

    #[test]
    fn empty_dataset_gives_empty_view() {
        assert!(chart().view().is_empty());
    }
}
