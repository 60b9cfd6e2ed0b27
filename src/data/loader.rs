use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, Schema};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, LoadResult};
use super::model::{is_index_column, Column, LoadReport, Post, PostDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a post dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Sentiment`, `Platform`, `Country`,
///   `Hashtags`, `Hour`, `Likes`, `Retweets` (recommended)
/// * `.json`    – `[{ "Sentiment": "...", "Likes": 12, ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
///
/// Parsing is lenient: a bad or missing cell becomes the field default and is
/// counted in [`LoadReport::coerced_cells`], only unreadable files fail.
pub fn load_file(path: &Path) -> LoadResult<PostDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let report = &dataset.report;
    for col in &report.dropped_columns {
        log::info!("Dropped index column {col:?} from {}", path.display());
    }
    if !report.missing_columns.is_empty() {
        log::warn!(
            "{} lacks columns {:?}; those fields default for every post",
            path.display(),
            report.missing_columns
        );
    }
    if report.coerced_cells > 0 {
        log::warn!(
            "{}: {} malformed or empty cells replaced by defaults",
            path.display(),
            report.coerced_cells
        );
    }
    Ok(dataset)
}

fn open(path: &Path) -> LoadResult<File> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Cell coercion shared by all formats
// ---------------------------------------------------------------------------

/// A raw source cell before coercion.
#[derive(Debug, Clone, PartialEq)]
enum Cell<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Null,
}

/// Maps header names to field columns, separating out index artifacts.
#[derive(Debug, Default)]
struct ColumnIndex {
    positions: BTreeMap<Column, usize>,
    dropped: Vec<String>,
}

impl ColumnIndex {
    fn from_headers<'h>(headers: impl IntoIterator<Item = &'h str>) -> Self {
        let mut index = ColumnIndex::default();
        for (pos, name) in headers.into_iter().enumerate() {
            if is_index_column(name) {
                index.dropped.push(name.to_string());
            } else if let Some(col) = Column::from_header(name) {
                index.positions.entry(col).or_insert(pos);
            } else {
                log::debug!("Ignoring unknown column {name:?}");
            }
        }
        index
    }

    fn get(&self, col: Column) -> Option<usize> {
        self.positions.get(&col).copied()
    }

    fn into_report(self, report: &mut LoadReport) {
        report.missing_columns = Column::ALL
            .into_iter()
            .filter(|c| !self.positions.contains_key(c))
            .collect();
        report.dropped_columns = self.dropped;
    }
}

/// Turns cells into typed fields, counting every default it has to apply.
/// `None` means the column is absent altogether; that is reported once as a
/// missing column rather than per cell.
struct Coercer<'r> {
    report: &'r mut LoadReport,
}

impl Coercer<'_> {
    fn text(&mut self, cell: Option<Cell<'_>>) -> String {
        match cell {
            Some(Cell::Text(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Cell::Number(n)) => n.to_string(),
            Some(Cell::Text(_) | Cell::Null) => {
                self.report.coerced_cells += 1;
                String::new()
            }
            None => String::new(),
        }
    }

    fn number(&mut self, cell: Option<Cell<'_>>) -> f64 {
        let parsed = match cell {
            Some(Cell::Text(s)) => s.trim().parse::<f64>().ok(),
            Some(Cell::Number(n)) => Some(n),
            Some(Cell::Null) => None,
            None => return 0.0,
        };
        match parsed {
            Some(v) if v.is_finite() => v,
            _ => {
                self.report.coerced_cells += 1;
                0.0
            }
        }
    }

    fn hour(&mut self, cell: Option<Cell<'_>>) -> i64 {
        self.number(cell).trunc() as i64
    }

    fn post<'a>(&mut self, mut cell: impl FnMut(Column) -> Option<Cell<'a>>) -> Post {
        Post {
            sentiment: self.text(cell(Column::Sentiment)),
            platform: self.text(cell(Column::Platform)),
            country: self.text(cell(Column::Country)),
            hashtags: self.text(cell(Column::Hashtags)),
            hour: self.hour(cell(Column::Hour)),
            likes: self.number(cell(Column::Likes)),
            retweets: self.number(cell(Column::Retweets)),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one post per row.  Header names
/// are matched exactly; cell values are trimmed.  A short row has its missing
/// trailing cells defaulted, a row longer than the header is rejected.
fn load_csv(path: &Path) -> LoadResult<PostDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .flexible(true)
        .from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::NoColumns);
    }
    let index = ColumnIndex::from_headers(headers.iter());

    let mut report = LoadReport::new(path);
    let mut posts = Vec::new();
    {
        let mut coerce = Coercer {
            report: &mut report,
        };
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > headers.len() {
                return Err(LoadError::InvalidShape(format!(
                    "row {} has {} fields, header has {}",
                    row + 1,
                    record.len(),
                    headers.len()
                )));
            }
            let post = coerce.post(|col| {
                index.get(col).map(|i| match record.get(i) {
                    Some(text) => Cell::Text(Cow::Borrowed(text)),
                    None => Cell::Null,
                })
            });
            posts.push(post);
        }
    }

    index.into_report(&mut report);
    Ok(PostDataset::from_posts(posts, report))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Sentiment": "Positive", "Platform": "Twitter", "Hour": 12, "Likes": 30.0, ... },
///   ...
/// ]
/// ```
///
/// A key absent from one record but present in others counts as a null cell.
fn load_json(path: &Path) -> LoadResult<PostDataset> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::InvalidShape("expected a top-level JSON array".into()))?;

    let mut seen_columns: Vec<Column> = Vec::new();
    let mut dropped: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::InvalidShape(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if is_index_column(key) {
                if !dropped.contains(key) {
                    dropped.push(key.clone());
                }
            } else if let Some(col) = Column::from_header(key) {
                if !seen_columns.contains(&col) {
                    seen_columns.push(col);
                }
            }
        }
    }

    let mut report = LoadReport::new(path);
    let mut posts = Vec::with_capacity(records.len());
    {
        let mut coerce = Coercer {
            report: &mut report,
        };
        // Shape was checked above.
        for obj in records.iter().filter_map(JsonValue::as_object) {
            let post = coerce.post(|col| {
                if !seen_columns.contains(&col) {
                    return None;
                }
                Some(obj.get(col.header()).map_or(Cell::Null, json_cell))
            });
            posts.push(post);
        }
    }

    if !records.is_empty() {
        report.missing_columns = Column::ALL
            .into_iter()
            .filter(|c| !seen_columns.contains(c))
            .collect();
    }
    report.dropped_columns = dropped;
    Ok(PostDataset::from_posts(posts, report))
}

fn json_cell(val: &JsonValue) -> Cell<'_> {
    match val {
        JsonValue::String(s) => Cell::Text(Cow::Borrowed(s)),
        JsonValue::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
        JsonValue::Bool(b) => Cell::Text(Cow::Owned(b.to_string())),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(Cow::Owned(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of posts.
///
/// Each field is one flat column. String, integer and float columns are read
/// directly; any other type is rendered to text first and then coerced.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> LoadResult<PostDataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let schema: &Schema = builder.schema();
    if schema.fields().is_empty() {
        return Err(LoadError::NoColumns);
    }
    let index = ColumnIndex::from_headers(schema.fields().iter().map(|f| f.name().as_str()));
    let reader = builder.build()?;

    let mut report = LoadReport::new(path);
    let mut posts = Vec::new();
    {
        let mut coerce = Coercer {
            report: &mut report,
        };
        for batch_result in reader {
            let batch = batch_result?;
            let columns = batch.columns();
            for row in 0..batch.num_rows() {
                let post = coerce.post(|col| index.get(col).map(|i| arrow_cell(&columns[i], row)));
                posts.push(post);
            }
        }
    }

    index.into_report(&mut report);
    Ok(PostDataset::from_posts(posts, report))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell<'_> {
    if col.is_null(row) {
        return Cell::Null;
    }
    let direct = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| Cell::Text(Cow::Borrowed(a.value(row)))),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| Cell::Text(Cow::Borrowed(a.value(row)))),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| Cell::Number(a.value(row))),
        _ => None,
    };
    direct.unwrap_or_else(|| {
        // Dictionary strings, small ints, booleans, timestamps...
        ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())
            .map(|f| Cell::Text(Cow::Owned(f.value(row).to_string())))
            .unwrap_or(Cell::Null)
    })
}
