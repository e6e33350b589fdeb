use uuid::Uuid;

use crate::database::repository::RecordStore;
use crate::forms::error::{FormError, FormResult};
use crate::forms::property::{AutoFillSource, OptionList, Property, PropertyKind, SelectOption};

/// Replace the options of `auto_fill_data = "store"` select properties with the
/// workspace's store records, in store order. Anything else passes through.
pub async fn resolve(property: Property, workspace_id: Uuid, store: &dyn RecordStore) -> FormResult<Property> {
    if property.auto_fill_data != Some(AutoFillSource::Store) {
        return Ok(property);
    }
    if !matches!(property.kind, PropertyKind::Select(_) | PropertyKind::MultiSelect(_)) {
        return Ok(property);
    }

    let records = store.list_records(workspace_id).await.map_err(|e| {
        tracing::error!("Auto-fill lookup failed for workspace {}: {}", workspace_id, e);
        FormError::StorageUnavailable(format!("Could not load store records for property '{}'", property.id))
    })?;

    let options = OptionList {
        options: records
            .into_iter()
            .map(|record| SelectOption::new(record.name, record.alternate_code))
            .collect(),
    };

    tracing::debug!(
        "Auto-filled {} option(s) for property '{}'",
        options.options.len(),
        property.id
    );

    let mut resolved = property;
    resolved.kind = match resolved.kind {
        PropertyKind::MultiSelect(_) => PropertyKind::MultiSelect(options),
        _ => PropertyKind::Select(options),
    };
    Ok(resolved)
}

/// Resolve every property of a form, preserving order
pub async fn resolve_all(
    properties: Vec<Property>,
    workspace_id: Uuid,
    store: &dyn RecordStore,
) -> FormResult<Vec<Property>> {
    let mut resolved = Vec::with_capacity(properties.len());
    for property in properties {
        resolved.push(resolve(property, workspace_id, store).await?);
    }
    Ok(resolved)
}
