use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::common::errors::{DomainError, Result};
use crate::domain::entities::trash_entry::{ContentEntry, Correlation, MetadataRecord};

/// Joins metadata records and content entries by id.
///
/// Output is ordered: records (matched or dangling) by id, then orphaned
/// content by id. Two entries on the same side claiming one id is a
/// collision and fails the whole join instead of dropping either entry.
pub fn correlate(
    records: Vec<MetadataRecord>,
    contents: Vec<ContentEntry>,
) -> Result<Vec<Correlation>> {
    let records = index_by_id(records, |record| &record.id, "TrashInfo")?;
    let mut contents = index_by_id(contents, |content| &content.id, "TrashContent")?;

    let mut correlations = Vec::with_capacity(records.len() + contents.len());

    for (id, record) in records {
        match contents.remove(&id) {
            Some(content) => correlations.push(Correlation::Matched { record, content }),
            None => correlations.push(Correlation::DanglingMetadata { record }),
        }
    }

    correlations.extend(
        contents
            .into_values()
            .map(|content| Correlation::OrphanContent { content }),
    );

    Ok(correlations)
}

fn index_by_id<T, F>(
    entries: Vec<T>,
    id_of: F,
    entity_type: &'static str,
) -> Result<BTreeMap<OsString, T>>
where
    F: Fn(&T) -> &OsString,
{
    let mut index = BTreeMap::new();
    for entry in entries {
        let id = id_of(&entry).clone();
        if index.contains_key(&id) {
            return Err(DomainError::already_exists(
                entity_type,
                id.to_string_lossy().into_owned(),
            ));
        }
        index.insert(id, entry);
    }
    Ok(index)
}
