use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{Dataset, RatingCategory, ReviewRecord, MAX_RATING};
use crate::error::DataLoadError;

pub const AIRLINE_COLUMN: &str = "Airline Name";
pub const DATE_COLUMN: &str = "Date Flown";

/// Every column the source must carry, in dataset order.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![AIRLINE_COLUMN];
    cols.extend(RatingCategory::ALL.iter().map(|c| c.column()));
    cols.push(DATE_COLUMN);
    cols
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the review dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the review column names (recommended)
/// * `.json`    – `[{ "Airline Name": "...", "Overall_Rating": 7, ... }, ...]`
/// * `.parquet` – one column per field; `Date Flown` may be `Date32` or text
pub fn load_file(path: &Path) -> Result<Dataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let io_err = |source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    match ext.as_str() {
        "csv" => load_csv(std::fs::File::open(path).map_err(io_err)?),
        "json" => load_json(&std::fs::read_to_string(path).map_err(io_err)?),
        "parquet" | "pq" => load_parquet(std::fs::File::open(path).map_err(io_err)?),
        other => Err(DataLoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Raw row shared by every format
// ---------------------------------------------------------------------------

/// A review exactly as it appears in the source, before type checks.
#[derive(Debug, Default, Deserialize)]
struct RawReview {
    #[serde(rename = "Airline Name")]
    airline: Option<String>,
    #[serde(rename = "Overall_Rating")]
    overall: Option<String>,
    #[serde(rename = "Seat Comfort")]
    seat_comfort: Option<String>,
    #[serde(rename = "Cabin Staff Service")]
    cabin_staff_service: Option<String>,
    #[serde(rename = "Food & Beverages")]
    food_beverages: Option<String>,
    #[serde(rename = "Ground Service")]
    ground_service: Option<String>,
    #[serde(rename = "Inflight Entertainment")]
    inflight_entertainment: Option<String>,
    #[serde(rename = "Wifi & Connectivity")]
    wifi_connectivity: Option<String>,
    #[serde(rename = "Value For Money")]
    value_for_money: Option<String>,
    #[serde(rename = "Date Flown")]
    date_flown: Option<String>,
}

impl RawReview {
    fn slot(&mut self, column: &str) -> Option<&mut Option<String>> {
        let slot = match column {
            AIRLINE_COLUMN => &mut self.airline,
            "Overall_Rating" => &mut self.overall,
            "Seat Comfort" => &mut self.seat_comfort,
            "Cabin Staff Service" => &mut self.cabin_staff_service,
            "Food & Beverages" => &mut self.food_beverages,
            "Ground Service" => &mut self.ground_service,
            "Inflight Entertainment" => &mut self.inflight_entertainment,
            "Wifi & Connectivity" => &mut self.wifi_connectivity,
            "Value For Money" => &mut self.value_for_money,
            DATE_COLUMN => &mut self.date_flown,
            _ => return None,
        };
        Some(slot)
    }

    fn into_record(self, row: usize) -> Result<ReviewRecord, DataLoadError> {
        let airline = self
            .airline
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(DataLoadError::MalformedRecord {
                row,
                message: format!("'{AIRLINE_COLUMN}' is empty"),
            })?;

        let raw_date = self.date_flown.unwrap_or_default();
        let date_flown =
            parse_flight_date(&raw_date).ok_or_else(|| DataLoadError::InvalidField {
                row,
                column: DATE_COLUMN.to_string(),
                value: raw_date.clone(),
                reason: "is not a recognised date",
            })?;

        let detailed = [
            self.seat_comfort,
            self.cabin_staff_service,
            self.food_beverages,
            self.ground_service,
            self.inflight_entertainment,
            self.wifi_connectivity,
            self.value_for_money,
        ];
        let mut categories = [None; 7];
        for ((slot, raw), category) in categories
            .iter_mut()
            .zip(detailed.iter())
            .zip(RatingCategory::DETAILED)
        {
            *slot = parse_rating(raw.as_deref(), row, category)?;
        }

        Ok(ReviewRecord {
            airline,
            overall: parse_rating(self.overall.as_deref(), row, RatingCategory::Overall)?,
            categories,
            date_flown,
        })
    }
}

/// Parse one rating cell. Empty means absent; integral floats such as
/// `"7.0"` are accepted.
fn parse_rating(
    raw: Option<&str>,
    row: usize,
    category: RatingCategory,
) -> Result<Option<u8>, DataLoadError> {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let invalid = |reason| DataLoadError::InvalidField {
        row,
        column: category.column().to_string(),
        value: text.to_string(),
        reason,
    };

    let value = match text.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = text
                .parse::<f64>()
                .map_err(|_| invalid("is not an integer rating"))?;
            if !f.is_finite() || f.fract() != 0.0 {
                return Err(invalid("is not an integer rating"));
            }
            f as i64
        }
    };

    if !(0..=i64::from(MAX_RATING)).contains(&value) {
        return Err(invalid("is outside the 0-10 rating range"));
    }
    Ok(Some(value as u8))
}

/// Parse the flight date. Month-only dates ("June 2019") map to the first
/// of the month.
pub fn parse_flight_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // ISO date-time: only the date part matters.
    if let Some(prefix) = s.get(..10) {
        if s.len() > 10 {
            if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(d);
            }
        }
    }
    let with_day = format!("1 {s}");
    ["%d %B %Y", "%d %b %Y"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_day, fmt).ok())
}

fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), DataLoadError> {
    let present: Vec<&str> = present.into_iter().map(str::trim).collect();
    match required_columns()
        .into_iter()
        .find(|col| !present.contains(col))
    {
        Some(missing) => Err(DataLoadError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the review column names; extra columns are
/// ignored. Empty rating cells are absent ratings.
pub fn load_csv<R: Read>(source: R) -> Result<Dataset, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(source);
    check_columns(reader.headers()?.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawReview>().enumerate() {
        let raw = result?;
        records.push(raw.into_record(i + 1)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Airline Name": "Qatar Airways", "Overall_Rating": 9, "Seat Comfort": null, ..., "Date Flown": "2019-06-01" },
///   ...
/// ]
/// ```
pub fn load_json(text: &str) -> Result<Dataset, DataLoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root.as_array().ok_or(DataLoadError::MalformedRecord {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row_no = i + 1;
        let obj = row.as_object().ok_or_else(|| DataLoadError::MalformedRecord {
            row: row_no,
            message: "not a JSON object".to_string(),
        })?;
        if i == 0 {
            check_columns(obj.keys().map(String::as_str))?;
        }

        let mut raw = RawReview::default();
        for (key, value) in obj {
            if let Some(slot) = raw.slot(key) {
                *slot = json_to_text(value);
            }
        }
        records.push(raw.into_record(row_no)?);
    }

    Ok(Dataset::from_records(records))
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per review field.
///
/// Rating columns may be integer, float or string typed; nulls are absent
/// ratings. Works with files written by both **Pandas** and **Polars**.
pub fn load_parquet(file: std::fs::File) -> Result<Dataset, DataLoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    let mut checked = false;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        if !checked {
            check_columns(schema.fields().iter().map(|f| f.name().as_str()))?;
            checked = true;
        }

        let columns: Vec<(&'static str, &ArrayRef)> = required_columns()
            .into_iter()
            .map(|name| {
                schema
                    .index_of(name)
                    .map(|idx| (name, batch.column(idx)))
                    .map_err(|_| DataLoadError::MissingColumn(name.to_string()))
            })
            .collect::<Result<_, _>>()?;

        for row in 0..batch.num_rows() {
            let mut raw = RawReview::default();
            for (name, col) in &columns {
                let cell = extract_cell(name, col, row)?;
                if let Some(slot) = raw.slot(name) {
                    *slot = cell;
                }
            }
            records.push(raw.into_record(records.len() + 1)?);
        }
    }

    Ok(Dataset::from_records(records))
}

// -- Arrow helpers --

/// Read a single cell as text; `None` for null.
fn extract_cell(column: &str, col: &ArrayRef, row: usize) -> Result<Option<String>, DataLoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let unsupported = || DataLoadError::UnsupportedColumnType {
        column: column.to_string(),
        data_type: format!("{:?}", col.data_type()),
    };

    let text = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| a.value(row).to_string()),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| a.value(row).to_string()),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| a.value(row).to_string()),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| a.value(row).to_string()),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| a.value(row).to_string()),
        DataType::Date32 => col
            .as_primitive_opt::<Date32Type>()
            .and_then(|a| date32_to_naive(a.value(row)))
            .map(|d| d.format("%Y-%m-%d").to_string()),
        _ => None,
    };

    text.map(Some).ok_or_else(unsupported)
}

/// Days since the Unix epoch → calendar date.
fn date32_to_naive(days: i32) -> Option<NaiveDate> {
    // 719_163 days separate 0001-01-01 (CE day 1) from 1970-01-01.
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(719_163)?)
}
