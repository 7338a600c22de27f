use std::io;

use anyhow::{bail, Result};
use tracing::info;

use crate::alias::{all_aliases, delete_alias, resolve_alias, set_alias};
use crate::args::{AliasCommand, TouchCommand};
use crate::auth;
use crate::cfg::Cfg;
use crate::format::{format_values, scan_values};
use crate::resolve::Resolver;
use crate::sheets;
use crate::spec::DataSpec;
use crate::store::FileStore;

fn resolve_spec(cfg: &Cfg, spec_args: &[String]) -> Result<DataSpec> {
    let store = FileStore::open(&cfg.alias_file)?;
    let spec = Resolver::new(&store, &cfg.alias_prefix).resolve(spec_args)?;
    Ok(spec)
}

pub async fn get(cfg: &Cfg, spec_args: &[String]) -> Result<()> {
    let spec = resolve_spec(cfg, spec_args)?;
    if spec.is_workbook() {
        bail!("get requires a data spec that is a worksheet or range, not a workbook");
    }

    let hub = auth::sheets_hub(cfg).await?;
    let rows = sheets::fetch_values(&hub, &spec).await?;

    if rows.is_empty() {
        println!("No data found.");
    } else {
        print!("{}", format_values(&rows, cfg.output_format)?);
    }
    Ok(())
}

pub async fn cat(cfg: &Cfg, spec_args: &[String]) -> Result<()> {
    let spec = resolve_spec(cfg, spec_args)?;
    if !spec.is_worksheet() {
        bail!("data spec must specify a worksheet: {:?}", spec_args);
    }

    let hub = auth::sheets_hub(cfg).await?;
    let chunk_size = cfg.read_chunk_size.max(1);

    let mut start = 1;
    loop {
        let chunk_ref = format!("{}!{}:{}", spec.worksheet, start, start + chunk_size - 1);
        let rows = sheets::fetch_values_at(&hub, &spec.workbook, &chunk_ref).await?;
        print!("{}", format_values(&rows, cfg.output_format)?);

        if rows.len() < chunk_size {
            break;
        }
        start += chunk_size;
    }
    Ok(())
}

pub async fn tail(cfg: &Cfg, spec_args: &[String], lines: u32) -> Result<()> {
    let spec = resolve_spec(cfg, spec_args)?;
    if !spec.is_worksheet() {
        bail!("data spec must specify a worksheet: {:?}", spec_args);
    }

    let hub = auth::sheets_hub(cfg).await?;
    let grid_rows = sheets::worksheet_grid_rows(&hub, &spec).await?;
    let last_row =
        sheets::find_last_data_row(&hub, &spec, grid_rows, cfg.read_chunk_size as u32).await?;

    if last_row == 0 {
        return Ok(());
    }

    // The last line is included in the count.
    let first_row = last_row.saturating_sub(lines.saturating_sub(1)).max(1);
    let chunk_ref = format!("{}!{}:{}", spec.worksheet, first_row, last_row);
    let rows = sheets::fetch_values_at(&hub, &spec.workbook, &chunk_ref).await?;
    print!("{}", format_values(&rows, cfg.output_format)?);
    Ok(())
}

pub async fn ls(cfg: &Cfg, spec_args: &[String]) -> Result<()> {
    let spec = resolve_spec(cfg, spec_args)?;
    if !spec.is_workbook() {
        bail!("data spec must specify a workbook: {:?}", spec_args);
    }

    let hub = auth::sheets_hub(cfg).await?;
    for title in sheets::list_worksheets(&hub, &spec.workbook).await? {
        println!("{}", title);
    }
    Ok(())
}

pub async fn put(cfg: &Cfg, spec_args: &[String], force_put: bool) -> Result<()> {
    let spec = resolve_spec(cfg, spec_args)?;
    if spec.is_workbook() {
        bail!("data cannot be put to a whole workbook; specify a worksheet or range");
    }

    let data = scan_values(io::stdin(), cfg.output_format)?;
    info!("Read {} rows from stdin", data.len());

    let hub = auth::sheets_hub(cfg).await?;

    if spec.is_worksheet() {
        sheets::write_data_to_worksheet(&hub, &spec, &data, cfg.protect_worksheets, force_put)
            .await?;
    } else {
        // Writing to a range of full rows or columns has no defined shape.
        if !spec.range.is_fixed_size() {
            bail!("ranges must be of fixed size to be put to");
        }
        sheets::write_data_to_range(&hub, &spec, &data).await?;
    }
    Ok(())
}

pub async fn touch(cfg: &Cfg, command: &TouchCommand) -> Result<()> {
    match command {
        TouchCommand::Workbook { title } => {
            let title = match title {
                Some(title) => title.clone(),
                // If this is also empty, the Sheets default "Untitled
                // spreadsheet" title is used.
                None => cfg.default_workbook_title.clone(),
            };

            let hub = auth::sheets_hub(cfg).await?;
            let spreadsheet_id = sheets::create_workbook(&hub, &title).await?;
            // Print just the new ID, for scripting.
            println!("{}", spreadsheet_id);
        }
        TouchCommand::Worksheet { spec } => {
            let spec = resolve_spec(cfg, spec)?;
            if !spec.is_worksheet() {
                bail!("touch worksheet requires a worksheet spec");
            }
            let hub = auth::sheets_hub(cfg).await?;
            sheets::ensure_worksheet(&hub, &spec).await?;
        }
    }
    Ok(())
}

pub async fn rm(cfg: &Cfg, spec_args: &[String], force_delete: bool) -> Result<()> {
    let spec = resolve_spec(cfg, spec_args)?;
    if spec.is_workbook() {
        bail!("you can't delete a workbook with this command");
    }

    if spec.is_worksheet() && cfg.protect_worksheets && !force_delete {
        bail!(
            "protection prevents deletion of: ({}); use --force-delete to force",
            spec
        );
    }

    println!("Deleting: {}", spec);
    let hub = auth::sheets_hub(cfg).await?;

    if spec.is_worksheet() {
        sheets::delete_worksheet(&hub, &spec).await?;
    } else {
        // Deleting a range means filling it with empty cells.
        sheets::clear_range(&hub, &spec).await?;
    }
    Ok(())
}

pub fn alias(cfg: &Cfg, command: &AliasCommand) -> Result<()> {
    let mut store = FileStore::open(&cfg.alias_file)?;

    match command {
        AliasCommand::Get { name: None } => {
            for (name, spec) in all_aliases(&store)? {
                println!("{} => ({})", name, spec);
            }
        }
        AliasCommand::Get { name: Some(name) } => {
            let spec = resolve_alias(&store, name)?;
            println!("{} => ({})", name, spec);
        }
        AliasCommand::Set {
            name,
            workbook,
            worksheet,
        } => {
            let mut spec = DataSpec::for_workbook(workbook);
            if let Some(worksheet) = worksheet {
                let fragment = DataSpec::parse_worksheet_fragment(worksheet)?;
                spec.worksheet = fragment.worksheet;
                spec.range = fragment.range;
            }
            println!("Setting alias {} to ({})", name, spec);
            set_alias(&mut store, name, &spec)?;
        }
        AliasCommand::Rm { name } => {
            delete_alias(&mut store, name)?;
            println!("Deleted alias {}", name);
        }
    }
    Ok(())
}

pub fn config(cfg: &Cfg, key: Option<&str>) -> Result<()> {
    let settings = serde_json::to_value(cfg)?;
    match key {
        Some(key) => match settings.get(key) {
            Some(value) => println!("{}: {}", key, value),
            None => bail!("no such config item: {}", key),
        },
        None => {
            // Aliases have their own file and their own command.
            println!("# For aliases, use 'gsheet alias get' instead");
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
