use airline_dash::charts::{BarControls, ChartComponent, LineControls};
use airline_dash::data::aggregate::SortOrder;
use airline_dash::data::model::{Dataset, RatingCategory, ReviewRecord};
use airline_dash::error::SelectionError;
use airline_dash::selection::Selection;
use airline_dash::state::{Dashboard, BAR_TITLE, HEATMAP_TITLE, LINE_TITLE};
use chrono::NaiveDate;

fn review(airline: &str, overall: u8, year: i32) -> ReviewRecord {
    ReviewRecord {
        airline: airline.to_string(),
        overall: Some(overall),
        categories: [Some(overall / 2); 7],
        date_flown: NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date"),
    }
}

fn dashboard() -> Dashboard {
    let dataset = Dataset::from_records(vec![
        review("Emirates", 8, 2018),
        review("Emirates", 6, 2019),
        review("Lufthansa", 4, 2019),
        review("Qatar Airways", 9, 2020),
    ]);
    Dashboard::assemble(dataset).expect("dashboard")
}

fn emirates() -> Selection {
    Selection::Airline("Emirates".into())
}

#[test]
fn assembly_subscribes_all_three_charts() {
    let d = dashboard();
    assert_eq!(d.coordinator().listener_count(), 3);
    assert_eq!(d.selection(), Selection::All);
    assert_eq!(d.bar.chart.title(), BAR_TITLE);
    assert_eq!(d.line.chart.title(), LINE_TITLE);
    assert_eq!(d.heatmap.chart.title(), HEATMAP_TITLE);
    assert!(d.faults().is_empty());
}

#[test]
fn bar_pick_highlights_everywhere_and_filters_the_line() {
    let mut d = dashboard();

    let next = d.bar.chart.on_user_pick("Emirates").expect("known airline");
    assert_eq!(next, emirates());

    assert_eq!(d.selection(), emirates());
    assert_eq!(d.bar.chart.highlight(), emirates());
    assert_eq!(d.heatmap.chart.highlight(), emirates());
    assert_eq!(d.line.chart.filter(), emirates());
    let years: Vec<i32> = d.line.chart.view().iter().map(|p| p.key).collect();
    assert_eq!(years, [2018, 2019]);
}

#[test]
fn picking_the_selected_airline_again_clears_the_selection() {
    let mut d = dashboard();
    d.heatmap.chart.on_user_pick("Emirates").expect("select");
    let next = d.bar.chart.on_user_pick("Emirates").expect("toggle");

    assert_eq!(next, Selection::All);
    assert_eq!(d.selection(), Selection::All);
    assert_eq!(d.line.chart.view().len(), 3);
}

#[test]
fn picking_another_airline_switches_the_selection() {
    let mut d = dashboard();
    d.bar.chart.on_user_pick("Emirates").expect("select");
    d.heatmap.chart.on_user_pick("Lufthansa").expect("switch");
    assert_eq!(d.bar.chart.highlight(), Selection::Airline("Lufthansa".into()));
}

#[test]
fn picking_an_unknown_airline_changes_nothing() {
    let mut d = dashboard();
    d.bar.chart.on_user_pick("Emirates").expect("select");
    let err = d.bar.chart.on_user_pick("Oceanic").expect_err("unknown");
    assert_eq!(err, SelectionError::InvalidSelectionValue("Oceanic".into()));
    assert_eq!(d.heatmap.chart.highlight(), emirates());
}

#[test]
fn line_dropdown_drives_the_other_charts() {
    let mut d = dashboard();
    d.line.chart.on_local_control_changed(LineControls {
        airline: Some(Selection::Airline("Qatar Airways".into())),
    });
    assert_eq!(d.bar.chart.highlight(), Selection::Airline("Qatar Airways".into()));

    d.line.chart.on_local_control_changed(LineControls {
        airline: Some(Selection::All),
    });
    assert_eq!(d.heatmap.chart.highlight(), Selection::All);
}

#[test]
fn bar_controls_stay_local() {
    let mut d = dashboard();
    d.bar.chart.on_user_pick("Lufthansa").expect("select");
    d.bar.chart.on_local_control_changed(BarControls {
        category: Some(RatingCategory::SeatComfort),
        sort_order: Some(SortOrder::HighestFirst),
    });

    assert_eq!(d.selection(), Selection::Airline("Lufthansa".into()));
    let keys: Vec<String> = d.bar.chart.view().into_iter().map(|r| r.key).collect();
    assert_eq!(keys, ["Qatar Airways", "Emirates", "Lufthansa"]);
}

#[test]
fn clear_selection_resets_to_all() {
    let mut d = dashboard();
    d.bar.chart.on_user_pick("Emirates").expect("select");
    d.clear_selection();
    assert_eq!(d.line.chart.filter(), Selection::All);
}

#[test]
fn teardown_releases_subscriptions_once() {
    let mut d = dashboard();
    d.teardown();
    assert_eq!(d.coordinator().listener_count(), 0);
    d.teardown();
    assert_eq!(d.coordinator().listener_count(), 0);

    // Detached charts no longer follow the selection.
    d.clear_selection();
    d.bar.chart.on_user_pick("Emirates").expect("still a valid value");
    assert_eq!(d.selection(), emirates());
    assert_eq!(d.heatmap.chart.highlight(), Selection::All);
}

#[test]
fn empty_dataset_assembles_with_empty_views() {
    let d = Dashboard::assemble(Dataset::default()).expect("dashboard");
    assert!(d.bar.chart.view().is_empty());
    assert!(d.line.chart.view().is_empty());
    assert!(d.heatmap.chart.view().is_empty());
}
