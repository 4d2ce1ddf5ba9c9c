use crate::core::parse_msrp_bounds;
use crate::models::VehicleRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the vehicle catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("catalog contains no usable rows")]
    Empty,
}

const COL_BRAND: &str = "Brand";
const COL_MODEL: &str = "Model";
const COL_MODEL_YEAR: &str = "Model Year";
const COL_MSRP_RANGE: &str = "MSRP Range";
const COL_VEHICLE_TYPE: &str = "Vehicle Type";
const COL_FUEL_TYPE: &str = "Fuel Type";
const COL_DRIVE_TYPE: &str = "Drive Type";
const COL_CAR_SIZE: &str = "Car Size";

/// The static vehicle catalog, loaded once at startup and read-only
/// afterwards.
///
/// The loader is tolerant of messy exports: headers are trimmed, optional
/// columns may be absent, and any column it does not recognize is carried
/// through verbatim so the scorer can still match against it. MSRP bounds
/// are derived once here; rows whose range text has no dollar figure get
/// an unknown (not zero) minimum price.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    records: Vec<VehicleRecord>,
}

impl CatalogStore {
    /// Load the catalog from a CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref())?;
        let store = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} vehicles from {}",
            store.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    /// Load the catalog from any CSV byte stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| normalize_header(h))
            .collect();

        for required in [COL_BRAND, COL_MODEL, COL_MODEL_YEAR, COL_MSRP_RANGE] {
            if !headers.iter().any(|h| h == required) {
                return Err(CatalogError::MissingColumn(required));
            }
        }

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            if let Some(record) = parse_row(&headers, &row) {
                records.push(record);
            }
        }

        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Collapse whitespace runs so "Model  Year " and "Model Year" are the
/// same column.
fn normalize_header(header: &str) -> String {
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_row(headers: &[String], row: &StringRecord) -> Option<VehicleRecord> {
    let mut columns: HashMap<&str, &str> = HashMap::new();
    for (header, value) in headers.iter().zip(row.iter()) {
        columns.insert(header.as_str(), value);
    }

    let brand = columns.get(COL_BRAND).copied().unwrap_or("").to_string();
    let model = columns.get(COL_MODEL).copied().unwrap_or("").to_string();
    if brand.is_empty() || model.is_empty() {
        tracing::warn!("Skipping catalog row without brand/model: {:?}", row);
        return None;
    }

    let model_year = columns
        .get(COL_MODEL_YEAR)
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(0);

    let msrp_range = columns
        .get(COL_MSRP_RANGE)
        .copied()
        .unwrap_or("")
        .to_string();
    let (msrp_min, msrp_max) = parse_msrp_bounds(&msrp_range);

    let known = [
        COL_BRAND,
        COL_MODEL,
        COL_MODEL_YEAR,
        COL_MSRP_RANGE,
        COL_VEHICLE_TYPE,
        COL_FUEL_TYPE,
        COL_DRIVE_TYPE,
        COL_CAR_SIZE,
    ];
    let extras: HashMap<String, String> = columns
        .iter()
        .filter(|(header, value)| !known.contains(header) && !value.is_empty())
        .map(|(header, value)| (header.to_string(), value.to_string()))
        .collect();

    Some(VehicleRecord {
        brand,
        model,
        model_year,
        msrp_range,
        msrp_min,
        msrp_max,
        vehicle_type: columns.get(COL_VEHICLE_TYPE).copied().unwrap_or("").to_string(),
        fuel_type: columns.get(COL_FUEL_TYPE).copied().unwrap_or("").to_string(),
        drive_type: columns.get(COL_DRIVE_TYPE).copied().unwrap_or("").to_string(),
        car_size: columns.get(COL_CAR_SIZE).copied().unwrap_or("").to_string(),
        extras,
    })
}
