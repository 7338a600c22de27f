use anyhow::{anyhow, bail, Context, Result};
use google_sheets4::api::{
    AddSheetRequest, BatchUpdateSpreadsheetRequest, ClearValuesRequest, DeleteSheetRequest,
    Request, SheetProperties, Spreadsheet, SpreadsheetProperties, ValueRange,
};
use google_sheets4::{hyper, hyper_rustls, Sheets};
use tracing::{debug, info};

use crate::spec::DataSpec;

pub type SheetsHub = Sheets<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

fn rows_from_values(values: Option<Vec<Vec<serde_json::Value>>>) -> Vec<Vec<String>> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

fn values_from_rows(rows: &[Vec<String>]) -> ValueRange {
    ValueRange {
        values: Some(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| serde_json::Value::String(cell.clone()))
                        .collect()
                })
                .collect(),
        ),
        ..Default::default()
    }
}

/// Fetch the values the spec addresses.
pub async fn fetch_values(hub: &SheetsHub, spec: &DataSpec) -> Result<Vec<Vec<String>>> {
    fetch_values_at(hub, &spec.workbook, &spec.wire_ref()).await
}

/// Fetch values at an explicit range reference within a workbook.
pub async fn fetch_values_at(
    hub: &SheetsHub,
    workbook: &str,
    range_ref: &str,
) -> Result<Vec<Vec<String>>> {
    debug!("Fetching {} from workbook {}", range_ref, workbook);
    let (_, value_range) = hub
        .spreadsheets()
        .values_get(workbook, range_ref)
        .doit()
        .await
        .map_err(|e| anyhow!("unable to retrieve data from sheet: {}", e))?;
    Ok(rows_from_values(value_range.values))
}

/// Clear everything the spec addresses. Refuses when worksheet protection is
/// on, unless forced.
pub async fn clear_worksheet(
    hub: &SheetsHub,
    spec: &DataSpec,
    protect: bool,
    force: bool,
) -> Result<()> {
    if protect && !force {
        bail!("protection prevents clearing of: ({})", spec);
    }

    hub.spreadsheets()
        .values_clear(ClearValuesRequest::default(), &spec.workbook, &spec.wire_ref())
        .doit()
        .await
        .map_err(|e| anyhow!("unable to clear worksheet ({}): {}", spec, e))?;

    Ok(())
}

/// Clear a range-level spec.
pub async fn clear_range(hub: &SheetsHub, spec: &DataSpec) -> Result<()> {
    if !spec.is_range() {
        bail!("not a range: {}", spec);
    }
    hub.spreadsheets()
        .values_clear(ClearValuesRequest::default(), &spec.workbook, &spec.wire_ref())
        .doit()
        .await
        .map_err(|e| anyhow!("unable to clear range: {}", e))?;
    Ok(())
}

pub fn check_data_fits_in_range(spec: &DataSpec, data: &[Vec<String>]) -> Result<()> {
    let (range_cols, range_rows) = spec.range.size_xy();

    if data.len() > range_rows as usize {
        bail!(
            "data overflow: {} rows in range, {} in data",
            range_rows,
            data.len()
        );
    }

    if let Some(first_row) = data.first() {
        if first_row.len() > range_cols as usize {
            bail!(
                "data overflow: {} columns in range, {} in data",
                range_cols,
                first_row.len()
            );
        }
    }

    Ok(())
}

/// Clear a worksheet and replace its contents.
pub async fn write_data_to_worksheet(
    hub: &SheetsHub,
    spec: &DataSpec,
    data: &[Vec<String>],
    protect: bool,
    force: bool,
) -> Result<()> {
    clear_worksheet(hub, spec, protect, force).await?;

    info!("Writing {} rows to {}", data.len(), spec);
    hub.spreadsheets()
        .values_update(values_from_rows(data), &spec.workbook, &spec.wire_ref())
        .value_input_option("USER_ENTERED")
        .doit()
        .await
        .map_err(|e| anyhow!("unable to write data to worksheet: {}", e))?;

    Ok(())
}

/// Clear a fixed-size range and write data that fits inside it.
pub async fn write_data_to_range(
    hub: &SheetsHub,
    spec: &DataSpec,
    data: &[Vec<String>],
) -> Result<()> {
    check_data_fits_in_range(spec, data)?;
    clear_range(hub, spec).await?;

    info!("Writing {} rows to {}", data.len(), spec);
    hub.spreadsheets()
        .values_update(values_from_rows(data), &spec.workbook, &spec.wire_ref())
        .value_input_option("USER_ENTERED")
        .doit()
        .await
        .map_err(|e| anyhow!("unable to write data to range: {}", e))?;

    Ok(())
}

async fn get_spreadsheet(hub: &SheetsHub, workbook: &str) -> Result<Spreadsheet> {
    let (_, spreadsheet) = hub
        .spreadsheets()
        .get(workbook)
        .doit()
        .await
        .map_err(|e| anyhow!("unable to retrieve workbook {}: {}", workbook, e))?;
    Ok(spreadsheet)
}

/// Titles of all worksheets in a workbook.
pub async fn list_worksheets(hub: &SheetsHub, workbook: &str) -> Result<Vec<String>> {
    let spreadsheet = get_spreadsheet(hub, workbook).await?;
    Ok(spreadsheet
        .sheets
        .unwrap_or_default()
        .into_iter()
        .filter_map(|sheet| sheet.properties.and_then(|p| p.title))
        .collect())
}

/// The grid row count of the named worksheet. This is the grid size (1000
/// for new sheets), not the amount of data in it.
pub async fn worksheet_grid_rows(hub: &SheetsHub, spec: &DataSpec) -> Result<u32> {
    let spreadsheet = get_spreadsheet(hub, &spec.workbook).await?;
    for sheet in spreadsheet.sheets.unwrap_or_default() {
        if let Some(properties) = sheet.properties {
            if properties.title.as_deref() == Some(spec.worksheet.as_str()) {
                let rows = properties
                    .grid_properties
                    .and_then(|g| g.row_count)
                    .unwrap_or(0);
                return Ok(rows.max(0) as u32);
            }
        }
    }
    bail!(
        "unable to find worksheet {} in workbook {}",
        spec.worksheet,
        spec.workbook
    )
}

/// Scan backwards from the end of the grid in read_chunk_size chunks; the
/// first non-empty chunk seen ends at the last data row.
pub async fn find_last_data_row(
    hub: &SheetsHub,
    spec: &DataSpec,
    grid_rows: u32,
    chunk_size: u32,
) -> Result<u32> {
    let chunk_size = chunk_size.max(1);
    let mut chunk_end = grid_rows;

    while chunk_end > 1 {
        let chunk_start = chunk_end.saturating_sub(chunk_size).max(1);
        let chunk_ref = format!("{}!{}:{}", spec.worksheet, chunk_start, chunk_end);
        let rows = fetch_values_at(hub, &spec.workbook, &chunk_ref).await?;

        // No values come back when the chunk holds no data, so the first
        // non-empty chunk scanning backwards from eof ends at our last row.
        if !rows.is_empty() {
            return Ok(chunk_start + rows.len() as u32 - 1);
        }
        chunk_end = chunk_start;
    }

    Ok(0)
}

/// Create a new workbook and return its spreadsheet ID.
pub async fn create_workbook(hub: &SheetsHub, title: &str) -> Result<String> {
    info!("Creating workbook: {}", title);
    let request = Spreadsheet {
        properties: Some(SpreadsheetProperties {
            title: Some(title.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let (_, spreadsheet) = hub
        .spreadsheets()
        .create(request)
        .doit()
        .await
        .map_err(|e| anyhow!("unable to create workbook: {}", e))?;

    spreadsheet
        .spreadsheet_id
        .context("no spreadsheet ID in create response")
}

/// Create the worksheet the spec names, unless it already exists.
pub async fn ensure_worksheet(hub: &SheetsHub, spec: &DataSpec) -> Result<()> {
    let existing = list_worksheets(hub, &spec.workbook).await?;
    if existing.iter().any(|title| title == &spec.worksheet) {
        debug!("Worksheet {} already exists", spec.worksheet);
        return Ok(());
    }

    info!("Creating worksheet: {}", spec.worksheet);
    let request = BatchUpdateSpreadsheetRequest {
        requests: Some(vec![Request {
            add_sheet: Some(AddSheetRequest {
                properties: Some(SheetProperties {
                    title: Some(spec.worksheet.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    };

    hub.spreadsheets()
        .batch_update(request, &spec.workbook)
        .doit()
        .await
        .map_err(|e| anyhow!("unable to create worksheet: {}", e))?;

    Ok(())
}

/// Delete the worksheet the spec names from its workbook.
pub async fn delete_worksheet(hub: &SheetsHub, spec: &DataSpec) -> Result<()> {
    let spreadsheet = get_spreadsheet(hub, &spec.workbook).await?;

    let sheet_id = spreadsheet
        .sheets
        .unwrap_or_default()
        .into_iter()
        .filter_map(|sheet| sheet.properties)
        .find(|properties| properties.title.as_deref() == Some(spec.worksheet.as_str()))
        .and_then(|properties| properties.sheet_id)
        .ok_or_else(|| anyhow!("unable to find worksheet: {}", spec.worksheet))?;

    info!("Deleting worksheet: {}", spec.worksheet);
    let request = BatchUpdateSpreadsheetRequest {
        requests: Some(vec![Request {
            delete_sheet: Some(DeleteSheetRequest {
                sheet_id: Some(sheet_id),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    };

    hub.spreadsheets()
        .batch_update(request, &spec.workbook)
        .doit()
        .await
        .map_err(|e| anyhow!("unable to delete worksheet: {}", e))?;

    Ok(())
}
