use std::collections::BTreeMap;
use std::str::FromStr;

use indexmap::IndexMap;

use super::model::{Dataset, RatingCategory, ReviewRecord};
use crate::selection::Selection;

// ---------------------------------------------------------------------------
// Aggregated view rows
// ---------------------------------------------------------------------------

/// One row of an aggregated view: a group key, its metric and how many
/// samples produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePoint<K> {
    pub key: K,
    pub value: f64,
    pub count: usize,
}

/// Bar ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Alphabetical,
    HighestFirst,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Alphabetical, SortOrder::HighestFirst];

    pub fn id(self) -> &'static str {
        match self {
            SortOrder::Alphabetical => "Alphabetically",
            SortOrder::HighestFirst => "Highest to Lowest Rating",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.id() == s)
            .ok_or_else(|| format!("unknown sort order '{s}'"))
    }
}

/// Mean of the present values; 0 when none are present.
fn mean_of(values: impl Iterator<Item = u8>) -> (f64, usize) {
    let (sum, count) = values.fold((0u64, 0usize), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        (0.0, 0)
    } else {
        (sum as f64 / count as f64, count)
    }
}

// ---------------------------------------------------------------------------
// Categorical bar: per-airline mean of one category
// ---------------------------------------------------------------------------

/// Mean and count of present `category` values per airline.
///
/// Every airline of the dataset gets a row, even when all its values are
/// absent (mean 0, count 0).
pub fn category_means(
    dataset: &Dataset,
    category: RatingCategory,
    order: SortOrder,
) -> Vec<AggregatePoint<String>> {
    let mut groups: IndexMap<&str, Vec<u8>> = dataset
        .airlines()
        .iter()
        .map(|a| (a.as_str(), Vec::new()))
        .collect();
    for record in dataset.records() {
        if let (Some(values), Some(v)) = (groups.get_mut(record.airline.as_str()), record.rating(category)) {
            values.push(v);
        }
    }

    let mut rows: Vec<AggregatePoint<String>> = groups
        .into_iter()
        .map(|(airline, values)| {
            let (value, count) = mean_of(values.into_iter());
            AggregatePoint {
                key: airline.to_string(),
                value,
                count,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.key.cmp(&b.key));
    if order == SortOrder::HighestFirst {
        // Stable: equal means stay alphabetical.
        rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    }
    rows
}

/// Average of the per-airline means, the baseline for bar deviations.
pub fn overall_average(rows: &[AggregatePoint<String>]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|r| r.value).sum::<f64>() / rows.len() as f64
}

// ---------------------------------------------------------------------------
// Temporal line: mean overall rating per flight year
// ---------------------------------------------------------------------------

/// Mean overall rating and number of reviews per year, ascending by year.
///
/// Only rows of the selected airline take part unless the selection is
/// [`Selection::All`]. The count is the number of reviews flown that year;
/// the mean covers those with an overall rating.
pub fn yearly_trend(dataset: &Dataset, selection: &Selection) -> Vec<AggregatePoint<i32>> {
    let mut years: BTreeMap<i32, (Vec<u8>, usize)> = BTreeMap::new();
    for record in dataset.records().iter().filter(|r| selection.matches(&r.airline)) {
        let entry = years.entry(record.year()).or_default();
        entry.1 += 1;
        if let Some(v) = record.overall {
            entry.0.push(v);
        }
    }

    years
        .into_iter()
        .map(|(year, (ratings, rows))| AggregatePoint {
            key: year,
            value: mean_of(ratings.into_iter()).0,
            count: rows,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Density heatmap: review counts per (airline, overall rating)
// ---------------------------------------------------------------------------

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub airline: String,
    pub rating: u8,
    /// Heat intensity.
    pub count: usize,
    /// Mean first-principal-axis score of the cell's complete-data reviews.
    /// Informational only; never drives the colour.
    pub mean_projection: Option<f64>,
}

/// Count reviews per (airline, overall rating). Airlines keep dataset order,
/// ratings ascend. Reviews without an overall rating are skipped.
pub fn rating_density(dataset: &Dataset) -> Vec<HeatCell> {
    let axis = PrincipalAxis::fit(dataset.records());

    let mut cells: IndexMap<&str, BTreeMap<u8, (usize, f64, usize)>> = IndexMap::new();
    for record in dataset.records() {
        let Some(rating) = record.overall else {
            continue;
        };
        let cell = cells
            .entry(record.airline.as_str())
            .or_default()
            .entry(rating)
            .or_default();
        cell.0 += 1;
        if let Some(score) = axis.as_ref().and_then(|a| a.project(record)) {
            cell.1 += score;
            cell.2 += 1;
        }
    }

    cells
        .into_iter()
        .flat_map(|(airline, ratings)| {
            ratings.into_iter().map(move |(rating, (count, sum, scored))| HeatCell {
                airline: airline.to_string(),
                rating,
                count,
                mean_projection: (scored > 0).then(|| sum / scored as f64),
            })
        })
        .collect()
}

/// Largest cell count, the top of the colour scale.
pub fn max_count(cells: &[HeatCell]) -> usize {
    cells.iter().map(|c| c.count).max().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Principal axis of the seven category ratings
// ---------------------------------------------------------------------------

const DIMS: usize = 7;
const POWER_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// First principal axis of the category-rating covariance, fitted over
/// reviews whose seven category ratings are all present.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalAxis {
    pub mean: [f64; DIMS],
    /// Unit vector; its largest-magnitude component is positive.
    pub direction: [f64; DIMS],
}

/// Dominant eigenvector of `cov` reached from `seed`; `None` when the seed
/// has no component along any axis with variance.
fn power_iterate(cov: &[[f64; DIMS]; DIMS], seed: [f64; DIMS]) -> Option<[f64; DIMS]> {
    let mut v = seed;
    for _ in 0..POWER_ITERATIONS {
        let mut next = [0.0; DIMS];
        for (i, slot) in next.iter_mut().enumerate() {
            *slot = (0..DIMS).map(|j| cov[i][j] * v[j]).sum();
        }
        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < CONVERGENCE {
            return None;
        }
        next.iter_mut().for_each(|x| *x /= norm);
        let delta: f64 = next.iter().zip(&v).map(|(a, b)| (a - b).abs()).sum();
        v = next;
        if delta < CONVERGENCE {
            break;
        }
    }
    Some(v)
}

impl PrincipalAxis {
    /// `None` with fewer than two complete reviews or zero variance.
    pub fn fit(records: &[ReviewRecord]) -> Option<Self> {
        let rows: Vec<[f64; DIMS]> = records.iter().filter_map(|r| r.complete_categories()).collect();
        if rows.len() < 2 {
            return None;
        }

        let n = rows.len() as f64;
        let mut mean = [0.0; DIMS];
        for row in &rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }

        let mut cov = [[0.0; DIMS]; DIMS];
        for row in &rows {
            for i in 0..DIMS {
                for j in 0..DIMS {
                    cov[i][j] += (row[i] - mean[i]) * (row[j] - mean[j]) / (n - 1.0);
                }
            }
        }

        let trace: f64 = (0..DIMS).map(|i| cov[i][i]).sum();
        if trace < CONVERGENCE {
            return None;
        }

        // The uniform seed is orthogonal to contrast axes (one category up,
        // another down); fall back to the widest single category.
        let widest = (0..DIMS)
            .max_by(|&a, &b| cov[a][a].total_cmp(&cov[b][b]))
            .unwrap_or(0);
        let mut basis = [0.0; DIMS];
        basis[widest] = 1.0;
        let mut v = power_iterate(&cov, [1.0 / (DIMS as f64).sqrt(); DIMS])
            .or_else(|| power_iterate(&cov, basis))?;

        let pivot = v
            .iter()
            .copied()
            .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
        if pivot < 0.0 {
            v.iter_mut().for_each(|x| *x = -*x);
        }

        Some(PrincipalAxis { mean, direction: v })
    }

    /// Centered score of a complete review along the axis.
    pub fn project(&self, record: &ReviewRecord) -> Option<f64> {
        let row = record.complete_categories()?;
        Some(
            row.iter()
                .zip(&self.mean)
                .zip(&self.direction)
                .map(|((x, m), d)| (x - m) * d)
                .sum(),
        )
    }
}
