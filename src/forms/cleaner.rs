// Cleaning pipeline: dry-run removal of Pro features a workspace is not entitled to
//
// simulate() never touches storage. It returns a new FormData plus a report of
// every downgrade it applied; the caller decides whether to persist the result.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::forms::entitlement::{permitted_features, FeatureFlag, WorkspaceEntitlement};
use crate::forms::error::{FormError, FormResult};
use crate::forms::form::{FormData, FormSettings};
use crate::forms::property::{BlockKind, Property, PropertyKind};

/// Fixed scale for rating fields
pub const RATING_MAX_VALUE: i64 = 5;

/// One simulated removal or downgrade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cleaning {
    /// None for form-level settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    pub field_name: String,
    pub feature: FeatureFlag,
    pub reason: String,
}

/// Removals in the order they were detected
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CleaningReport {
    entries: Vec<Cleaning>,
}

impl CleaningReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Cleaning] {
        &self.entries
    }

    /// "Field 'Name': reason" lines for user messaging
    pub fn summary(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|c| match c.field_id {
                Some(_) => format!("Field '{}': {}", c.field_name, c.reason),
                None => format!("Form: {}", c.reason),
            })
            .collect()
    }

    fn record(&mut self, field_id: Option<&str>, field_name: &str, feature: FeatureFlag) {
        self.entries.push(Cleaning {
            field_id: field_id.map(str::to_string),
            field_name: field_name.to_string(),
            feature,
            reason: feature.removal_reason().to_string(),
        });
    }
}

/// Sanitized form data and what was stripped to get there
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedForm {
    pub data: FormData,
    pub report: CleaningReport,
}

/// Clean `candidate` against the entitlement. All-or-nothing: a structural
/// problem fails the whole call before any property is processed.
pub fn simulate(candidate: &FormData, entitlement: &WorkspaceEntitlement) -> FormResult<CleanedForm> {
    validate_structure(candidate)?;

    let permitted = permitted_features(entitlement);
    let mut report = CleaningReport::default();

    let properties = candidate
        .properties
        .iter()
        .map(|property| clean_property(property, &permitted, &mut report))
        .collect();

    let settings = clean_settings(&candidate.settings, &permitted, &mut report);

    if !report.is_empty() {
        tracing::debug!(
            "Cleaning simulated {} removal(s) on form '{}' (pro={})",
            report.len(),
            candidate.title,
            entitlement.is_pro
        );
    }

    Ok(CleanedForm {
        data: FormData {
            title: candidate.title.clone(),
            visibility: candidate.visibility,
            properties,
            settings,
        },
        report,
    })
}

fn validate_structure(candidate: &FormData) -> FormResult<()> {
    let mut seen = HashSet::new();
    for property in &candidate.properties {
        if property.id.trim().is_empty() {
            return Err(FormError::validation("Property is missing an id"));
        }
        if !seen.insert(property.id.as_str()) {
            return Err(FormError::invalid_property(
                &property.id,
                format!("Duplicate property id '{}'", property.id),
            ));
        }
        if property.name.trim().is_empty() {
            return Err(FormError::invalid_property(&property.id, "Property name is required"));
        }
    }
    Ok(())
}

fn clean_property(property: &Property, permitted: &BTreeSet<FeatureFlag>, report: &mut CleaningReport) -> Property {
    let cleaned = FeatureFlag::required_by(property)
        .into_iter()
        .filter(|flag| !permitted.contains(flag))
        .fold(property.clone(), |current, flag| {
            report.record(Some(property.id.as_str()), &property.name, flag);
            downgrade(current, flag)
        });

    normalize(cleaned)
}

/// Per-flag downgrade policy. The result never requires `flag` again.
fn downgrade(mut property: Property, flag: FeatureFlag) -> Property {
    match flag {
        FeatureFlag::SignatureField => property.kind = PropertyKind::Text,
        FeatureFlag::CustomCodeBlock => property.kind = PropertyKind::Block(BlockKind::Text),
        FeatureFlag::FileUploadLink => property.kind = PropertyKind::Url { file_upload: false },
        FeatureFlag::ConditionalLogic => property.logic = None,
        // Form-level flags never apply to a property
        FeatureFlag::RemoveBranding | FeatureFlag::CustomCode | FeatureFlag::EditableSubmissions => {}
    }
    property
}

/// Entitlement-independent rules; never reported
fn normalize(mut property: Property) -> Property {
    if property.is_rating() {
        property.rating_max_value = Some(RATING_MAX_VALUE);
    }
    property
}

fn clean_settings(settings: &FormSettings, permitted: &BTreeSet<FeatureFlag>, report: &mut CleaningReport) -> FormSettings {
    let mut cleaned = settings.clone();
    for flag in FeatureFlag::required_by_settings(settings) {
        if permitted.contains(&flag) {
            continue;
        }
        report.record(None, "form", flag);
        match flag {
            FeatureFlag::RemoveBranding => cleaned.no_branding = false,
            FeatureFlag::CustomCode => cleaned.custom_code = None,
            FeatureFlag::EditableSubmissions => cleaned.editable_submissions = false,
            _ => {}
        }
    }
    cleaned
}
