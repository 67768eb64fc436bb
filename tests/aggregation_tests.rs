use std::collections::BTreeSet;

use airline_dash::data::aggregate::{
    category_means, max_count, overall_average, rating_density, yearly_trend, SortOrder,
};
use airline_dash::data::model::{Dataset, RatingCategory, ReviewRecord};
use airline_dash::selection::Selection;
use approx::assert_relative_eq;
use chrono::NaiveDate;
use proptest::prelude::*;

fn review(airline: &str, overall: Option<u8>, year: i32) -> ReviewRecord {
    ReviewRecord {
        airline: airline.to_string(),
        overall,
        categories: [Some(3); 7],
        date_flown: NaiveDate::from_ymd_opt(year, 6, 1).expect("valid date"),
    }
}

fn with_seat(mut record: ReviewRecord, seat: Option<u8>) -> ReviewRecord {
    record.categories[0] = seat;
    record
}

// ---------------------------------------------------------------------------
// Categorical bar
// ---------------------------------------------------------------------------

#[test]
fn mean_ignores_absent_ratings() {
    let dataset = Dataset::from_records(vec![
        review("X", Some(8), 2019),
        review("X", None, 2019),
        review("X", Some(6), 2020),
    ]);

    let rows = category_means(&dataset, RatingCategory::Overall, SortOrder::Alphabetical);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "X");
    assert_relative_eq!(rows[0].value, 7.0);
    assert_eq!(rows[0].count, 2);
}

#[test]
fn airline_with_only_absent_values_reports_zero() {
    let dataset = Dataset::from_records(vec![
        with_seat(review("X", Some(8), 2019), None),
        with_seat(review("Y", Some(5), 2019), Some(4)),
    ]);

    let rows = category_means(&dataset, RatingCategory::SeatComfort, SortOrder::Alphabetical);
    let x = rows.iter().find(|r| r.key == "X").expect("X keeps its row");
    assert_relative_eq!(x.value, 0.0);
    assert_eq!(x.count, 0);
}

#[test]
fn alphabetical_order_sorts_by_airline_name() {
    let dataset = Dataset::from_records(vec![
        review("Qatar Airways", Some(9), 2019),
        review("Emirates", Some(7), 2019),
        review("Lufthansa", Some(5), 2019),
    ]);
    let keys: Vec<String> = category_means(&dataset, RatingCategory::Overall, SortOrder::Alphabetical)
        .into_iter()
        .map(|r| r.key)
        .collect();
    assert_eq!(keys, ["Emirates", "Lufthansa", "Qatar Airways"]);
}

#[test]
fn highest_first_breaks_ties_alphabetically() {
    let dataset = Dataset::from_records(vec![
        review("C", Some(6), 2019),
        review("B", Some(9), 2019),
        review("A", Some(6), 2019),
    ]);
    let keys: Vec<String> = category_means(&dataset, RatingCategory::Overall, SortOrder::HighestFirst)
        .into_iter()
        .map(|r| r.key)
        .collect();
    assert_eq!(keys, ["B", "A", "C"]);
}

#[test]
fn overall_average_is_mean_of_bar_values() {
    let dataset = Dataset::from_records(vec![review("A", Some(4), 2019), review("B", Some(8), 2019)]);
    let rows = category_means(&dataset, RatingCategory::Overall, SortOrder::Alphabetical);
    assert_relative_eq!(overall_average(&rows), 6.0);
    assert_relative_eq!(overall_average(&[]), 0.0);
}

#[test]
fn empty_dataset_gives_empty_views() {
    let dataset = Dataset::default();
    assert!(category_means(&dataset, RatingCategory::Overall, SortOrder::HighestFirst).is_empty());
    assert!(yearly_trend(&dataset, &Selection::All).is_empty());
    assert!(rating_density(&dataset).is_empty());
}

// ---------------------------------------------------------------------------
// Temporal line
// ---------------------------------------------------------------------------

#[test]
fn yearly_trend_filters_to_the_selected_airline() {
    let dataset = Dataset::from_records(vec![
        review("X", Some(8), 2019),
        review("X", Some(6), 2019),
        review("Y", Some(2), 2019),
        review("X", Some(9), 2021),
    ]);

    let all = yearly_trend(&dataset, &Selection::All);
    assert_eq!(all.iter().map(|p| p.key).collect::<Vec<_>>(), [2019, 2021]);
    assert_relative_eq!(all[0].value, 16.0 / 3.0, epsilon = 1e-12);
    assert_eq!(all[0].count, 3);

    let x = yearly_trend(&dataset, &Selection::Airline("X".into()));
    assert_relative_eq!(x[0].value, 7.0);
    assert_eq!(x[0].count, 2);
    assert_relative_eq!(x[1].value, 9.0);
}

#[test]
fn yearly_trend_counts_reviews_without_an_overall_rating() {
    let dataset = Dataset::from_records(vec![review("X", Some(8), 2019), review("X", None, 2019)]);
    let trend = yearly_trend(&dataset, &Selection::All);
    assert_relative_eq!(trend[0].value, 8.0);
    assert_eq!(trend[0].count, 2);
}

#[test]
fn selected_airline_without_rows_gives_an_empty_trend() {
    let dataset = Dataset::from_records(vec![review("X", Some(8), 2019)]);
    assert!(yearly_trend(&dataset, &Selection::Airline("Y".into())).is_empty());
}

// ---------------------------------------------------------------------------
// Density heatmap
// ---------------------------------------------------------------------------

#[test]
fn density_counts_reviews_per_airline_and_rating() {
    let dataset = Dataset::from_records(vec![
        review("X", Some(8), 2019),
        review("X", Some(8), 2020),
        review("X", Some(3), 2020),
        review("Y", Some(8), 2020),
        review("Y", None, 2020),
    ]);

    let cells = rating_density(&dataset);
    let summary: Vec<(&str, u8, usize)> = cells
        .iter()
        .map(|c| (c.airline.as_str(), c.rating, c.count))
        .collect();
    assert_eq!(summary, [("X", 3, 1), ("X", 8, 2), ("Y", 8, 1)]);
    assert_eq!(max_count(&cells), 2);
}

#[test]
fn density_projection_needs_complete_categories() {
    let mut incomplete = review("X", Some(5), 2019);
    incomplete.categories[6] = None;
    let mut varied = review("Y", Some(9), 2019);
    varied.categories = [Some(5); 7];

    let dataset = Dataset::from_records(vec![incomplete, review("Y", Some(2), 2019), varied]);
    let cells = rating_density(&dataset);

    let x = cells.iter().find(|c| c.airline == "X").expect("X cell");
    assert_eq!(x.count, 1);
    assert_eq!(x.mean_projection, None);
    assert!(cells
        .iter()
        .filter(|c| c.airline == "Y")
        .all(|c| c.mean_projection.map_or(true, f64::is_finite)));
}

proptest! {
    #[test]
    fn yearly_trend_has_unique_ascending_years(
        rows in proptest::collection::vec((0usize..3, proptest::option::of(0u8..=10), 2010i32..2024), 0..60)
    ) {
        let names = ["A", "B", "C"];
        let dataset = Dataset::from_records(
            rows.iter().map(|(a, o, y)| review(names[*a], *o, *y)).collect(),
        );

        let trend = yearly_trend(&dataset, &Selection::All);
        let years: Vec<i32> = trend.iter().map(|p| p.key).collect();
        let unique: BTreeSet<i32> = years.iter().copied().collect();
        prop_assert_eq!(years.len(), unique.len());
        prop_assert!(years.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(trend.iter().map(|p| p.count).sum::<usize>(), rows.len());
        for point in &trend {
            prop_assert!((0.0..=10.0).contains(&point.value));
        }
    }

    #[test]
    fn every_airline_gets_one_bar_holding_its_mean(
        rows in proptest::collection::vec((0usize..4, proptest::option::of(0u8..=10)), 1..40),
        highest_first in any::<bool>(),
    ) {
        let names = ["A", "B", "C", "D"];
        let dataset = Dataset::from_records(
            rows.iter().map(|(a, o)| review(names[*a], *o, 2019)).collect(),
        );
        let order = if highest_first { SortOrder::HighestFirst } else { SortOrder::Alphabetical };

        let bars = category_means(&dataset, RatingCategory::Overall, order);
        prop_assert_eq!(bars.len(), dataset.airlines().len());
        prop_assert_eq!(bars.iter().map(|b| b.count).sum::<usize>(), rows.iter().filter(|(_, o)| o.is_some()).count());
        if highest_first {
            prop_assert!(bars.windows(2).all(|w| w[0].value >= w[1].value));
        }
        for bar in &bars {
            let present: Vec<f64> = rows
                .iter()
                .filter(|(a, _)| names[*a] == bar.key)
                .filter_map(|(_, o)| o.map(f64::from))
                .collect();
            let expected = if present.is_empty() {
                0.0
            } else {
                present.iter().sum::<f64>() / present.len() as f64
            };
            prop_assert_eq!(bar.count, present.len());
            prop_assert!((bar.value - expected).abs() < 1e-9);
        }
    }
}
