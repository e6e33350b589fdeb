use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::forms::form::FormSettings;
use crate::forms::property::{BlockKind, Property, PropertyKind};

/// Plan tier of the workspace that owns a form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEntitlement {
    pub is_pro: bool,
}

impl WorkspaceEntitlement {
    pub fn free() -> Self {
        Self { is_pro: false }
    }

    pub fn pro() -> Self {
        Self { is_pro: true }
    }
}

/// Features that are only available to Pro workspaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    // Property level
    SignatureField,
    CustomCodeBlock,
    FileUploadLink,
    ConditionalLogic,
    // Form level
    RemoveBranding,
    CustomCode,
    EditableSubmissions,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 7] = [
        FeatureFlag::SignatureField,
        FeatureFlag::CustomCodeBlock,
        FeatureFlag::FileUploadLink,
        FeatureFlag::ConditionalLogic,
        FeatureFlag::RemoveBranding,
        FeatureFlag::CustomCode,
        FeatureFlag::EditableSubmissions,
    ];

    /// Flags a property needs, kind-level flags first
    pub fn required_by(property: &Property) -> Vec<FeatureFlag> {
        let mut flags = Vec::new();

        match &property.kind {
            PropertyKind::Signature => flags.push(FeatureFlag::SignatureField),
            PropertyKind::Block(BlockKind::Code) => flags.push(FeatureFlag::CustomCodeBlock),
            PropertyKind::Url { file_upload: true } => flags.push(FeatureFlag::FileUploadLink),
            _ => {}
        }

        if property.has_conditional_logic() {
            flags.push(FeatureFlag::ConditionalLogic);
        }

        flags
    }

    /// Flags the form-level settings need
    pub fn required_by_settings(settings: &FormSettings) -> Vec<FeatureFlag> {
        let mut flags = Vec::new();
        if settings.no_branding {
            flags.push(FeatureFlag::RemoveBranding);
        }
        if settings.custom_code.as_deref().is_some_and(|code| !code.trim().is_empty()) {
            flags.push(FeatureFlag::CustomCode);
        }
        if settings.editable_submissions {
            flags.push(FeatureFlag::EditableSubmissions);
        }
        flags
    }

    /// Human-readable consequence shown when the flag is stripped
    pub fn removal_reason(self) -> &'static str {
        match self {
            FeatureFlag::SignatureField => "Signature field was converted to a text field.",
            FeatureFlag::CustomCodeBlock => "Custom code block was converted to a text block.",
            FeatureFlag::FileUploadLink => "Link field is not a file upload.",
            FeatureFlag::ConditionalLogic => "Conditional logic was removed.",
            FeatureFlag::RemoveBranding => "Form branding is not hidden.",
            FeatureFlag::CustomCode => "Custom code was disabled.",
            FeatureFlag::EditableSubmissions => "Users will not be able to edit their submissions.",
        }
    }
}

/// Every flag the tier allows. Pure; the answer depends on nothing but the tier.
pub fn permitted_features(entitlement: &WorkspaceEntitlement) -> BTreeSet<FeatureFlag> {
    if entitlement.is_pro {
        FeatureFlag::ALL.into_iter().collect()
    } else {
        BTreeSet::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pro_allows_everything_free_allows_nothing_gated() {
        assert_eq!(permitted_features(&WorkspaceEntitlement::pro()).len(), FeatureFlag::ALL.len());
        assert!(permitted_features(&WorkspaceEntitlement::free()).is_empty());
    }

    #[test]
    fn rating_needs_no_flag() {
        let prop = Property::new("r", "Stars", PropertyKind::Rating);
        assert!(FeatureFlag::required_by(&prop).is_empty());
    }

    #[test]
    fn kind_flag_precedes_logic_flag() {
        let mut prop = Property::new("s", "Sign", PropertyKind::Signature);
        prop.logic = Some(json!({"conditions": {"children": [1]}, "actions": []}));
        assert_eq!(
            FeatureFlag::required_by(&prop),
            vec![FeatureFlag::SignatureField, FeatureFlag::ConditionalLogic]
        );
    }

    #[test]
    fn blank_custom_code_is_not_gated() {
        let settings = FormSettings {
            custom_code: Some("   ".into()),
            ..Default::default()
        };
        assert!(FeatureFlag::required_by_settings(&settings).is_empty());
    }
}
