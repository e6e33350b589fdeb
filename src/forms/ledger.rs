use std::collections::HashSet;

use crate::forms::form::FormDefinition;
use crate::forms::property::Property;

/// Properties of `previous` that disappear in `new_properties` and must be
/// appended to the removed-properties ledger. Layout blocks carry no answers
/// and are skipped; ids already in the ledger are not added twice.
pub fn reconcile(previous: &FormDefinition, new_properties: &[Property]) -> Vec<Property> {
    let kept: HashSet<&str> = new_properties.iter().map(|p| p.id.as_str()).collect();
    let already_removed: HashSet<&str> = previous
        .removed_properties
        .iter()
        .map(|p| p.id.as_str())
        .collect();

    previous
        .data
        .properties
        .iter()
        .filter(|p| !p.is_system_managed())
        .filter(|p| !kept.contains(p.id.as_str()))
        .filter(|p| !already_removed.contains(p.id.as_str()))
        .cloned()
        .collect()
}

/// Existing ledger followed by the newly removed properties
pub fn merge(existing: &[Property], appended: Vec<Property>) -> Vec<Property> {
    let mut ledger = existing.to_vec();
    let mut seen: HashSet<String> = ledger.iter().map(|p| p.id.clone()).collect();
    for property in appended {
        if seen.insert(property.id.clone()) {
            ledger.push(property);
        }
    }
    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::form::FormData;
    use crate::forms::property::{BlockKind, PropertyKind};
    use uuid::Uuid;

    fn prop(id: &str) -> Property {
        Property::new(id, format!("Field {}", id), PropertyKind::Text)
    }

    fn form_with(properties: Vec<Property>) -> FormDefinition {
        let mut data = FormData::new("Ledger");
        data.properties = properties;
        FormDefinition::new(Uuid::new_v4(), Uuid::new_v4(), "ledger".into(), data)
    }

    #[test]
    fn dropped_field_is_recorded_once() {
        let mut form = form_with(vec![prop("1"), prop("2"), prop("3")]);
        let new_set = vec![prop("1"), prop("3")];

        let appended = reconcile(&form, &new_set);
        assert_eq!(appended, vec![prop("2")]);

        form.removed_properties = merge(&form.removed_properties, appended);
        assert_eq!(reconcile(&form, &new_set), Vec::<Property>::new());
        assert_eq!(merge(&form.removed_properties, vec![prop("2")]).len(), 1);
    }

    #[test]
    fn layout_blocks_are_not_recorded() {
        let form = form_with(vec![
            prop("1"),
            Property::new("b", "Break", PropertyKind::Block(BlockKind::PageBreak)),
        ]);
        assert!(reconcile(&form, &[prop("1")]).is_empty());
    }

    #[test]
    fn merge_keeps_existing_entries_first() {
        let merged = merge(&[prop("old")], vec![prop("new")]);
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "new"]);
    }
}
