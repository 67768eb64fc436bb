use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexSet;

// ---------------------------------------------------------------------------
// RatingCategory – the rating columns of a review
// ---------------------------------------------------------------------------

/// A rating column of the review dataset.
///
/// `Overall` is the headline score; the other seven are the per-category
/// scores that feed the heatmap projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RatingCategory {
    Overall,
    SeatComfort,
    CabinStaffService,
    FoodBeverages,
    GroundService,
    InflightEntertainment,
    WifiConnectivity,
    ValueForMoney,
}

impl RatingCategory {
    /// Every rating column, overall first.
    pub const ALL: [RatingCategory; 8] = [
        RatingCategory::Overall,
        RatingCategory::SeatComfort,
        RatingCategory::CabinStaffService,
        RatingCategory::FoodBeverages,
        RatingCategory::GroundService,
        RatingCategory::InflightEntertainment,
        RatingCategory::WifiConnectivity,
        RatingCategory::ValueForMoney,
    ];

    /// The seven per-category columns, in dataset column order.
    pub const DETAILED: [RatingCategory; 7] = [
        RatingCategory::SeatComfort,
        RatingCategory::CabinStaffService,
        RatingCategory::FoodBeverages,
        RatingCategory::GroundService,
        RatingCategory::InflightEntertainment,
        RatingCategory::WifiConnectivity,
        RatingCategory::ValueForMoney,
    ];

    /// Column header in the source file. Doubles as the option id in
    /// dropdowns.
    pub fn column(self) -> &'static str {
        match self {
            RatingCategory::Overall => "Overall_Rating",
            RatingCategory::SeatComfort => "Seat Comfort",
            RatingCategory::CabinStaffService => "Cabin Staff Service",
            RatingCategory::FoodBeverages => "Food & Beverages",
            RatingCategory::GroundService => "Ground Service",
            RatingCategory::InflightEntertainment => "Inflight Entertainment",
            RatingCategory::WifiConnectivity => "Wifi & Connectivity",
            RatingCategory::ValueForMoney => "Value For Money",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            RatingCategory::Overall => "Overall Rating",
            other => other.column(),
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RatingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RatingCategory::ALL
            .into_iter()
            .find(|c| c.column() == s)
            .ok_or_else(|| format!("unknown rating category '{s}'"))
    }
}

/// Highest score a rating column may hold.
pub const MAX_RATING: u8 = 10;

// ---------------------------------------------------------------------------
// ReviewRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One customer review. `None` marks an absent rating, which is never
/// treated as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub airline: String,
    pub overall: Option<u8>,
    /// Per-category ratings, indexed like [`RatingCategory::DETAILED`].
    pub categories: [Option<u8>; 7],
    pub date_flown: NaiveDate,
}

impl ReviewRecord {
    /// Rating for any column, overall included.
    pub fn rating(&self, category: RatingCategory) -> Option<u8> {
        match category {
            RatingCategory::Overall => self.overall,
            detailed => RatingCategory::DETAILED
                .iter()
                .position(|c| *c == detailed)
                .and_then(|i| self.categories[i]),
        }
    }

    /// All seven category ratings when none is absent.
    pub fn complete_categories(&self) -> Option<[f64; 7]> {
        let mut out = [0.0; 7];
        for (slot, value) in out.iter_mut().zip(self.categories.iter()) {
            *slot = f64::from((*value)?);
        }
        Some(out)
    }

    pub fn year(&self) -> i32 {
        self.date_flown.year()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable review table with its airline index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ReviewRecord>,
    /// Airline names in order of first appearance.
    airlines: IndexSet<String>,
}

impl Dataset {
    /// Build the airline index from the loaded records.
    pub fn from_records(records: Vec<ReviewRecord>) -> Self {
        let airlines = records.iter().map(|r| r.airline.clone()).collect();
        Dataset { records, airlines }
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn airlines(&self) -> &IndexSet<String> {
        &self.airlines
    }

    pub fn contains_airline(&self, airline: &str) -> bool {
        self.airlines.contains(airline)
    }

    /// Number of reviews.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
