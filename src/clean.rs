//! Normalization of raw race exports into per-precinct TSV files.
//!
//! An export is an HTML document holding one cover table followed by one
//! table per ward. Each ward table starts with a `Ward <n>` marker row and a
//! header row, and ends with a totals row.

use std::collections::HashMap;
use std::fs;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use encoding_rs::WINDOWS_1252;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::error::ScrapeError;
use crate::listing::collapse_ws;
use crate::store::Store;

pub const PRECINCT_COLUMN: &str = "Precinct";

static WARD_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Ward (\d+)").expect("valid ward regex"));
static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WardTable {
    pub ward: u32,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub path: Utf8PathBuf,
    pub wards: usize,
    pub rows: usize,
}

/// Cleans one raw export and writes `<root>/clean/<year>/<stem>.tsv`.
pub fn clean_file(store: &Store, raw_path: &Utf8Path) -> Result<CleanOutput, ScrapeError> {
    let bytes = fs::read(raw_path.as_std_path())
        .map_err(|err| ScrapeError::Filesystem(format!("read {raw_path}: {err}")))?;
    let html = decode_export(&bytes);
    let label = raw_path.file_name().unwrap_or(raw_path.as_str());

    let wards = parse_ward_tables(&html, label)?;
    if wards.is_empty() {
        return Err(ScrapeError::NoWardTables(label.to_string()));
    }
    let ward_count = wards.len();
    let table = concat_wards(wards);

    let out_path = store.clean_path_for(raw_path)?;
    Store::write_bytes_atomic(&out_path, &to_tsv(&table)?)?;
    info!(path = %out_path, wards = ward_count, rows = table.rows.len(), "wrote clean table");

    Ok(CleanOutput {
        path: out_path,
        wards: ward_count,
        rows: table.rows.len(),
    })
}

/// Exports are served without a charset; read them as Windows-1252.
pub fn decode_export(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Repairs a header read as Windows-1252 that was really UTF-8.
pub fn repair_header(header: &str) -> Result<String, ScrapeError> {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(header);
    if unmappable {
        return Err(ScrapeError::HeaderEncoding(header.to_string()));
    }
    String::from_utf8(bytes.into_owned())
        .map_err(|_| ScrapeError::HeaderEncoding(header.to_string()))
}

/// Title-cases like Python's `str.title`: a letter is upper-cased when it
/// does not follow another letter, lower-cased otherwise.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Pairs every `%` header with the header before it.
pub fn pair_percent_columns(headers: &[String]) -> Result<Vec<String>, usize> {
    let mut labels = headers.to_vec();
    for (index, header) in headers.iter().enumerate() {
        if header != "%" {
            continue;
        }
        let previous = match index.checked_sub(1).map(|prev| &headers[prev]) {
            Some(previous) if previous != "%" => previous,
            _ => return Err(index),
        };
        labels[index - 1] = format!("votes|{previous}");
        labels[index] = format!("pct|{previous}");
    }
    Ok(labels)
}

pub fn precinct_code(ward: u32, precinct: u32) -> Result<String, ScrapeError> {
    if ward > 99 || precinct > 999 {
        return Err(ScrapeError::PrecinctOutOfRange { ward, precinct });
    }
    Ok(format!("{ward:02}{precinct:03}"))
}

/// Every `<table>` in document order as rows of cell text, with `colspan`
/// cells repeated.
pub fn parse_tables(html: &str) -> Vec<Vec<Vec<String>>> {
    let document = Html::parse_document(html);
    document.select(&TABLE).map(table_rows).collect()
}

/// Parses every ward table of an export, skipping the leading cover table.
pub fn parse_ward_tables(html: &str, label: &str) -> Result<Vec<WardTable>, ScrapeError> {
    parse_tables(html)
        .into_iter()
        .enumerate()
        .skip(1)
        .map(|(index, rows)| clean_ward_table(rows, index, label))
        .collect()
}

pub fn clean_ward_table(
    rows: Vec<Vec<String>>,
    table_index: usize,
    label: &str,
) -> Result<WardTable, ScrapeError> {
    let ward = rows
        .first()
        .and_then(|row| row.first())
        .and_then(|cell| WARD_MARKER.captures(cell))
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .ok_or_else(|| ScrapeError::MissingWardMarker {
            file: label.to_string(),
            table: table_index,
        })?;

    let header_row = rows.get(1).ok_or_else(|| ScrapeError::MissingHeaderRow {
        file: label.to_string(),
        ward,
    })?;
    // The marker row's colspan does not count toward the width.
    let width = rows.iter().skip(1).map(Vec::len).max().unwrap_or(0);

    let mut headers = header_row
        .iter()
        .map(|cell| repair_header(cell).map(|text| title_case(&text)))
        .collect::<Result<Vec<_>, _>>()?;
    headers.resize(width, String::new());

    let columns =
        pair_percent_columns(&headers).map_err(|index| ScrapeError::AmbiguousPercentColumn {
            file: label.to_string(),
            ward,
            index,
        })?;

    let precinct_index = columns
        .iter()
        .position(|column| column == PRECINCT_COLUMN)
        .ok_or_else(|| ScrapeError::MissingPrecinctColumn {
            file: label.to_string(),
            ward,
        })?;

    let body_end = rows.len().saturating_sub(1).max(2);
    let mut data = Vec::new();
    for row in rows.into_iter().take(body_end).skip(2) {
        let mut cells: Vec<String> = row
            .into_iter()
            .map(|cell| cell.trim_end_matches('%').to_string())
            .collect();
        cells.resize(width, String::new());

        let raw_precinct = cells[precinct_index].trim();
        let precinct: u32 = raw_precinct.parse().map_err(|_| ScrapeError::InvalidPrecinct {
            file: label.to_string(),
            ward,
            value: raw_precinct.to_string(),
        })?;
        cells[precinct_index] = precinct_code(ward, precinct)?;
        data.push(cells);
    }

    Ok(WardTable {
        ward,
        columns,
        rows: data,
    })
}

/// Stacks ward tables. Columns are matched by name (and by occurrence for
/// repeated names) in first-appearance order; absent cells stay empty.
pub fn concat_wards(wards: Vec<WardTable>) -> CleanTable {
    let mut columns: Vec<String> = Vec::new();
    let mut slots: HashMap<(String, usize), usize> = HashMap::new();
    let mut layouts = Vec::with_capacity(wards.len());

    for ward in &wards {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut layout = Vec::with_capacity(ward.columns.len());
        for column in &ward.columns {
            let occurrence = seen.entry(column.as_str()).or_insert(0);
            let key = (column.clone(), *occurrence);
            *occurrence += 1;
            let slot = *slots.entry(key).or_insert_with(|| {
                columns.push(column.clone());
                columns.len() - 1
            });
            layout.push(slot);
        }
        layouts.push(layout);
    }

    let mut rows = Vec::new();
    for (ward, layout) in wards.into_iter().zip(layouts) {
        for row in ward.rows {
            let mut out = vec![String::new(); columns.len()];
            for (cell, slot) in row.into_iter().zip(&layout) {
                out[*slot] = cell;
            }
            rows.push(out);
        }
    }

    CleanTable { columns, rows }
}

pub fn to_tsv(table: &CleanTable) -> Result<Vec<u8>, ScrapeError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .map_err(|err| ScrapeError::Tsv(err.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|err| ScrapeError::Tsv(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| ScrapeError::Tsv(err.to_string()))
}

fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(row_cells(child)),
            "thead" | "tbody" | "tfoot" => {
                for tr in child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr")
                {
                    rows.push(row_cells(tr));
                }
            }
            _ => {}
        }
    }
    rows
}

fn row_cells(tr: ElementRef<'_>) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
    {
        let text = collapse_ws(&cell.text().collect::<String>());
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, 1000);
        cells.extend(std::iter::repeat_n(text, span));
    }
    cells
}
