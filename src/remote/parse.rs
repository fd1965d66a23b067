//! Turns downloaded bytes into data frames. These are blocking, CPU-bound
//! calls; async callers run them on the blocking pool.

use crate::remote::error::FetchError;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use log::debug;
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;

/// Header names pandas-style writers give to an exported row index.
const INDEX_ARTIFACTS: [&str; 3] = ["", "Unnamed: 0", "column_1"];

/// Parses CSV bytes with a header row, after skipping `skip_rows` leading lines.
pub(crate) fn csv_to_dataframe(
    bytes: Vec<u8>,
    url: &str,
    skip_rows: usize,
) -> Result<DataFrame, FetchError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(skip_rows)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| FetchError::CsvRead {
            url: url.to_string(),
            source: e,
        })
}

/// Reads one worksheet of an XLSX workbook. The first row after `skip_rows`
/// is the header.
///
/// Columns whose cells are all numeric (or empty) become `Float64`, everything
/// else becomes `String`. Empty cells are nulls.
pub(crate) fn xlsx_to_dataframe(
    bytes: Vec<u8>,
    url: &str,
    sheet: &str,
    skip_rows: usize,
) -> Result<DataFrame, FetchError> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).map_err(|e| FetchError::Workbook {
            url: url.to_string(),
            source: e,
        })?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| FetchError::Workbook {
            url: url.to_string(),
            source: e,
        })?;
    range_to_dataframe(&range, skip_rows).ok_or_else(|| FetchError::EmptySheet {
        url: url.to_string(),
        sheet: sheet.to_string(),
    })?
}

fn range_to_dataframe(
    range: &Range<Data>,
    skip_rows: usize,
) -> Option<Result<DataFrame, FetchError>> {
    let mut rows = range.rows().skip(skip_rows);
    let header = rows.next()?;
    let body: Vec<&[Data]> = rows.collect();

    let names = unique_names(header);
    let columns = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells_to_column(name, body.iter().map(|row| row.get(idx)))
        })
        .collect();

    Some(DataFrame::new(columns).map_err(FetchError::from))
}

fn unique_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("column_{}", idx + 1),
                other => other.to_string().trim().to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

// Rows shorter than the header yield `None` cells.
fn cells_to_column<'a>(
    name: &str,
    cells: impl Iterator<Item = Option<&'a Data>> + Clone,
) -> Column {
    let numeric = cells.clone().all(|cell| {
        matches!(
            cell,
            None | Some(Data::Int(_) | Data::Float(_) | Data::Empty)
        )
    });

    if numeric {
        let values: Vec<Option<f64>> = cells
            .map(|cell| match cell {
                Some(Data::Int(v)) => Some(*v as f64),
                Some(Data::Float(v)) => Some(*v),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .map(|cell| match cell {
                None | Some(Data::Empty) => None,
                Some(Data::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), values)
    }
}

/// Drops a leading row-index column left behind by the exporting tool.
pub(crate) fn drop_index_artifacts(frame: DataFrame) -> Result<DataFrame, FetchError> {
    let first = frame.get_column_names().first().map(|name| name.to_string());
    match first {
        Some(name) if INDEX_ARTIFACTS.contains(&name.as_str()) => {
            debug!("Dropping column {:?}", name);
            Ok(frame.drop(&name)?)
        }
        _ => {
            debug!("No index column to drop.");
            Ok(frame)
        }
    }
}

/// Moves `column` to the front so it acts as the row label column.
pub(crate) fn label_column_first(
    frame: DataFrame,
    column: &str,
    url: &str,
) -> Result<DataFrame, FetchError> {
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    if !names.iter().any(|name| name == column) {
        return Err(FetchError::MissingColumn {
            url: url.to_string(),
            column: column.to_string(),
        });
    }
    let order = std::iter::once(column.to_string())
        .chain(names.into_iter().filter(|name| name != column));
    Ok(frame.select(order)?)
}
