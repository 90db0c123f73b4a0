use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, PreparedTable, RawTable, WorkoutRecord};
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Required columns
// ---------------------------------------------------------------------------

pub const AGE: &str = "Age";
pub const DISTANCE: &str = "Distance(km)";
pub const BMI: &str = "BMI";
pub const GENDER: &str = "Gender";
pub const CALORIES: &str = "Calories Burned";
pub const HEART_RATE: &str = "Average Heart Rate";

/// The six base columns, in the order `prepare` resolves them.
pub const REQUIRED_COLUMNS: [&str; 6] = [AGE, DISTANCE, BMI, GENDER, CALORIES, HEART_RATE];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and prepare a workout table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one workout per line
/// * `.json`    – `[{ "Age": 40, "Gender": "Male", ... }, ...]`
/// * `.parquet` – any flat schema containing the six base columns
pub fn load_file(path: &Path) -> Result<PreparedTable, DataLoadError> {
    let raw = read_file(path)?;
    let table = prepare(raw)?;
    info!(
        "loaded {} workouts from {} ({} genders)",
        table.len(),
        path.display(),
        table.genders.len()
    );
    Ok(table)
}

/// Read a file into an untyped [`RawTable`] without interpreting any column.
pub fn read_file(path: &Path) -> Result<RawTable, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        std::fs::File::open(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    match ext.as_str() {
        "csv" => read_csv(open()?),
        "json" => read_json(open()?),
        "parquet" | "pq" => read_parquet(open()?),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// prepare – resolve columns and derive categories
// ---------------------------------------------------------------------------

/// Turn raw rows into a [`PreparedTable`].
///
/// Column names are matched ignoring case and whitespace. A required column
/// absent from the header is an error; a null or unparsable cell only leaves
/// that record's value (and any category derived from it) unset.
pub fn prepare(raw: RawTable) -> Result<PreparedTable, DataLoadError> {
    let positions: BTreeMap<String, usize> = raw
        .columns
        .iter()
        .enumerate()
        // Backwards, so the first of two columns with the same key wins.
        .rev()
        .map(|(i, name)| (column_key(name), i))
        .collect();

    let mut index = [0usize; 6];
    for (slot, name) in index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = *positions
            .get(&column_key(name))
            .ok_or(DataLoadError::MissingColumn(name))?;
    }
    let [age_i, dist_i, bmi_i, gender_i, cal_i, hr_i] = index;

    let mut unparsable: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut number = |row: &[CellValue], i: usize, name: &'static str| -> Option<f64> {
        let cell = row.get(i)?;
        let value = cell.as_f64();
        if value.is_none() && !cell.is_null() {
            *unparsable.entry(name).or_default() += 1;
        }
        value
    };

    let mut records = Vec::with_capacity(raw.rows.len());
    for (row_no, row) in raw.rows.iter().enumerate() {
        if row.len() != raw.columns.len() {
            return Err(DataLoadError::Malformed(format!(
                "row {row_no} has {} cells but the header has {} columns",
                row.len(),
                raw.columns.len()
            )));
        }
        records.push(WorkoutRecord::new(
            number(row, age_i, AGE),
            number(row, dist_i, DISTANCE),
            number(row, bmi_i, BMI),
            row[gender_i].as_text(),
            number(row, cal_i, CALORIES),
            number(row, hr_i, HEART_RATE),
        ));
    }

    for (column, count) in &unparsable {
        warn!("{count} non-numeric value(s) in column '{column}' treated as missing");
    }

    let uncategorized = records
        .iter()
        .filter(|r| {
            r.age_category.is_none() || r.distance_category.is_none() || r.bmi_category.is_none()
        })
        .count();
    if uncategorized > 0 {
        warn!("{uncategorized} workout(s) fall outside at least one category bucket");
    }

    Ok(PreparedTable::from_records(records))
}

/// Normalised column name: lower case with all whitespace removed.
fn column_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one workout per record.
/// Cell types are guessed per cell; empty cells are null.
pub fn read_csv<R: Read>(source: R) -> Result<RawTable, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(source);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(RawTable { columns, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as `df.to_json(orient='records')`
/// writes it):
///
/// ```json
/// [
///   { "Age": 40, "Distance(km)": 7.2, "BMI": 22.1, "Gender": "Male",
///     "Calories Burned": 512.0, "Average Heart Rate": 141 },
///   ...
/// ]
/// ```
///
/// The column set is the union of keys across all objects; a key missing
/// from an object is a null cell.
pub fn read_json<R: Read>(source: R) -> Result<RawTable, DataLoadError> {
    let root: JsonValue = serde_json::from_reader(source)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected a top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Read a Parquet file with a flat schema.
///
/// Integer, floating-point, boolean and string columns are supported; any
/// other type is rendered as text through an Arrow cast. Works with files
/// written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
pub fn read_parquet(file: std::fs::File) -> Result<RawTable, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let cells: Vec<Vec<CellValue>> = batch
            .columns()
            .iter()
            .map(column_cells)
            .collect::<Result<_, _>>()?;

        for row in 0..batch.num_rows() {
            rows.push(cells.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(RawTable { columns, rows })
}

// -- Arrow helpers --

/// Convert one Arrow column into cells, widening numbers to i64/f64.
fn column_cells(col: &ArrayRef) -> Result<Vec<CellValue>, DataLoadError> {
    let len = col.len();
    let dt = col.data_type();

    let cells = if dt.is_integer() {
        let arr = cast(col, &DataType::Int64)?;
        let arr = arr.as_primitive::<Int64Type>();
        (0..len)
            .map(|i| {
                if arr.is_null(i) {
                    CellValue::Null
                } else {
                    CellValue::Integer(arr.value(i))
                }
            })
            .collect()
    } else if dt.is_floating() || matches!(dt, DataType::Decimal128(_, _) | DataType::Decimal256(_, _)) {
        let arr = cast(col, &DataType::Float64)?;
        let arr = arr.as_primitive::<Float64Type>();
        (0..len)
            .map(|i| {
                let v = arr.value(i);
                if arr.is_null(i) || v.is_nan() {
                    CellValue::Null
                } else {
                    CellValue::Float(v)
                }
            })
            .collect()
    } else if let Some(arr) = col.as_any().downcast_ref::<BooleanArray>() {
        (0..len)
            .map(|i| {
                if arr.is_null(i) {
                    CellValue::Null
                } else {
                    CellValue::Bool(arr.value(i))
                }
            })
            .collect()
    } else {
        // Nested columns have no text form; they can only be extra columns,
        // so they load as nulls rather than failing the whole file.
        match cast(col, &DataType::Utf8) {
            Ok(arr) => {
                let arr = arr.as_string::<i32>();
                (0..len)
                    .map(|i| {
                        if arr.is_null(i) {
                            CellValue::Null
                        } else {
                            CellValue::String(arr.value(i).to_string())
                        }
                    })
                    .collect()
            }
            Err(e) => {
                debug!("column of type {dt} loaded as nulls: {e}");
                vec![CellValue::Null; len]
            }
        }
    };

    Ok(cells)
}
