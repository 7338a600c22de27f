use std::collections::BTreeMap;

use crate::error::{Result, SpecError};
use crate::range::CellRange;
use crate::spec::DataSpec;
use crate::store::{AliasRecord, AliasStore};

fn spec_from_record(record: &AliasRecord) -> Result<DataSpec> {
    let mut spec = DataSpec::default();
    if let Some(workbook) = &record.workbook {
        spec.workbook = workbook.clone();
    }
    if let Some(worksheet) = &record.worksheet {
        spec.worksheet = worksheet.clone();
    }
    if let Some(range) = &record.range {
        spec.range = CellRange::parse(range)?;
    }
    Ok(spec)
}

fn record_from_spec(spec: &DataSpec) -> AliasRecord {
    let mut record = AliasRecord::default();
    if !spec.workbook.is_empty() {
        record.workbook = Some(spec.workbook.clone());
    }
    if !spec.worksheet.is_empty() {
        record.worksheet = Some(spec.worksheet.clone());
    }
    if !spec.range.is_empty() {
        record.range = Some(spec.range.to_string());
    }
    record
}

/// Look up an alias and build the address it stands for.
///
/// An inline "name!range" form layers a range onto the alias; the inline
/// range wins over any stored one. That only makes sense for an alias that
/// designates a worksheet, so anything that would end up with a range but no
/// worksheet is rejected.
pub fn resolve_alias(store: &dyn AliasStore, name: &str) -> Result<DataSpec> {
    let (name, inline_range) = match name.split_once('!') {
        Some((name, range)) => (name, Some(CellRange::parse(range)?)),
        None => (name, None),
    };

    let record = store
        .get(name)
        .ok_or_else(|| SpecError::AliasNotFound(name.to_string()))?;
    let mut spec = spec_from_record(&record)?;

    if let Some(range) = inline_range {
        spec.range = range;
    }

    if !spec.range.is_empty() && spec.worksheet.is_empty() {
        return Err(SpecError::InvalidAliasRange(name.to_string()));
    }

    Ok(spec)
}

/// Store an alias. Overwriting is delete-then-insert: nothing of a previous
/// binding under the same name survives.
pub fn set_alias(store: &mut dyn AliasStore, name: &str, spec: &DataSpec) -> anyhow::Result<()> {
    if name.is_empty() {
        return Err(SpecError::EmptyAliasName.into());
    }
    store.remove(name);
    store.set(name, record_from_spec(spec));
    store.flush()
}

/// Remove an alias. Removing an alias that does not exist is an error.
pub fn delete_alias(store: &mut dyn AliasStore, name: &str) -> anyhow::Result<()> {
    if !store.remove(name) {
        return Err(SpecError::AliasNotFound(name.to_string()).into());
    }
    store.flush()
}

/// Every stored alias, resolved to its address form.
pub fn all_aliases(store: &dyn AliasStore) -> Result<BTreeMap<String, DataSpec>> {
    store
        .list()
        .iter()
        .map(|(name, record)| Ok((name.clone(), spec_from_record(record)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn store_with(entries: &[(&str, AliasRecord)]) -> MemStore {
        let mut store = MemStore::new();
        for (name, record) in entries {
            store.set(name, record.clone());
        }
        store
    }

    fn wb_record(wb: &str) -> AliasRecord {
        AliasRecord {
            workbook: Some(wb.to_string()),
            ..Default::default()
        }
    }

    fn ws_record(wb: &str, ws: &str) -> AliasRecord {
        AliasRecord {
            workbook: Some(wb.to_string()),
            worksheet: Some(ws.to_string()),
            ..Default::default()
        }
    }

    fn range_record(wb: &str, ws: &str, range: &str) -> AliasRecord {
        AliasRecord {
            workbook: Some(wb.to_string()),
            worksheet: Some(ws.to_string()),
            range: Some(range.to_string()),
        }
    }

    #[test]
    fn resolve_workbook_alias() {
        let store = store_with(&[("myworkbook", wb_record("mywb"))]);
        assert_eq!(
            resolve_alias(&store, "myworkbook").unwrap(),
            DataSpec::for_workbook("mywb")
        );
    }

    #[test]
    fn resolve_range_alias() {
        let store = store_with(&[("myrange", range_record("mywb", "myws", "A1:B2"))]);
        let spec = resolve_alias(&store, "myrange").unwrap();
        assert_eq!(spec.workbook, "mywb");
        assert_eq!(spec.worksheet, "myws");
        assert_eq!(spec.range.to_string(), "A1:B2");
    }

    #[test]
    fn resolve_missing_alias() {
        let store = MemStore::new();
        assert_eq!(
            resolve_alias(&store, "nope"),
            Err(SpecError::AliasNotFound("nope".to_string()))
        );
    }

    #[test]
    fn resolve_inline_range_on_worksheet_alias() {
        let store = store_with(&[("myws", ws_record("mywb", "myws"))]);
        let spec = resolve_alias(&store, "myws!A3:F6").unwrap();
        assert_eq!(spec.worksheet, "myws");
        assert_eq!(spec.range.to_string(), "A3:F6");
    }

    #[test]
    fn resolve_inline_range_overrides_stored_range() {
        let store = store_with(&[("myrange", range_record("mywb", "myws", "A1:B2"))]);
        let spec = resolve_alias(&store, "myrange!C3:D4").unwrap();
        assert_eq!(spec.range.to_string(), "C3:D4");
    }

    #[test]
    fn resolve_inline_range_on_workbook_alias_fails() {
        let store = store_with(&[("wbalias", wb_record("mywb"))]);
        assert_eq!(
            resolve_alias(&store, "wbalias!A1:B2"),
            Err(SpecError::InvalidAliasRange("wbalias".to_string()))
        );
    }

    #[test]
    fn resolve_inline_range_parse_error_comes_first() {
        // A bad inline range fails even when the alias doesn't exist.
        let store = MemStore::new();
        assert_eq!(
            resolve_alias(&store, "nope!doot"),
            Err(SpecError::InvalidRange("doot".to_string()))
        );
    }

    #[test]
    fn resolve_rejects_stored_range_without_worksheet() {
        // Only producible by hand-editing the alias file.
        let store = store_with(&[(
            "broken",
            AliasRecord {
                workbook: Some("mywb".to_string()),
                range: Some("A1:B2".to_string()),
                ..Default::default()
            },
        )]);
        assert_eq!(
            resolve_alias(&store, "broken"),
            Err(SpecError::InvalidAliasRange("broken".to_string()))
        );
    }

    #[test]
    fn set_alias_overwrites_rather_than_merges() {
        let mut store = MemStore::new();
        set_alias(&mut store, "x", &DataSpec::for_workbook("a")).unwrap();
        set_alias(
            &mut store,
            "x",
            &DataSpec {
                worksheet: "b".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let spec = resolve_alias(&store, "x").unwrap();
        assert_eq!(spec.workbook, "");
        assert_eq!(spec.worksheet, "b");
    }

    #[test]
    fn set_alias_rejects_empty_name() {
        let mut store = MemStore::new();
        assert!(set_alias(&mut store, "", &DataSpec::for_workbook("wb")).is_err());
    }

    #[test]
    fn delete_alias_is_strict() {
        let mut store = store_with(&[("x", wb_record("wb"))]);
        assert!(delete_alias(&mut store, "x").is_ok());
        assert!(delete_alias(&mut store, "x").is_err());
    }

    #[test]
    fn all_aliases_resolves_each_entry() {
        let store = store_with(&[
            ("mybook", wb_record("wb")),
            ("mydata", range_record("wb", "ws", "A1:B2")),
        ]);
        let all = all_aliases(&store).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["mybook"], DataSpec::for_workbook("wb"));
        assert!(all["mydata"].is_range());
    }
}
