// Property model and its JSON wire codec
//
// On the wire a property is a flat object keyed by `type`, with kind data in
// sibling keys (`select: { options }`, `file_upload`, `scale_*`). Internally the
// kind data lives inside `PropertyKind` so it cannot drift from the tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::forms::error::{FormError, FormResult};

/// One entry of a select / multi_select option list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
    #[serde(alias = "id")]
    pub value: String,
}

impl SelectOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionList {
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleConfig {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub step_value: Option<f64>,
}

/// Layout blocks injected by the editor rather than answered by respondents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    PageBreak,
    Divider,
    Image,
    Code,
}

impl BlockKind {
    const WIRE_NAMES: [(BlockKind, &'static str); 5] = [
        (BlockKind::Text, "nf-text"),
        (BlockKind::PageBreak, "nf-page-break"),
        (BlockKind::Divider, "nf-divider"),
        (BlockKind::Image, "nf-image"),
        (BlockKind::Code, "nf-code"),
    ];

    pub fn wire_name(self) -> &'static str {
        Self::WIRE_NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
            .unwrap_or("nf-text")
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::WIRE_NAMES
            .iter()
            .find(|(_, wire)| *wire == name)
            .map(|(kind, _)| *kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Text,
    Email,
    PhoneNumber,
    Number,
    Date,
    Checkbox,
    Url { file_upload: bool },
    Select(OptionList),
    MultiSelect(OptionList),
    Rating,
    Scale(ScaleConfig),
    Files { multiple: bool },
    Signature,
    Block(BlockKind),
}

impl PropertyKind {
    /// Wire `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyKind::Text => "text",
            PropertyKind::Email => "email",
            PropertyKind::PhoneNumber => "phone_number",
            PropertyKind::Number => "number",
            PropertyKind::Date => "date",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Url { .. } => "url",
            PropertyKind::Select(_) => "select",
            PropertyKind::MultiSelect(_) => "multi_select",
            PropertyKind::Rating => "rating",
            PropertyKind::Scale(_) => "scale",
            PropertyKind::Files { .. } => "files",
            PropertyKind::Signature => "signature",
            PropertyKind::Block(block) => block.wire_name(),
        }
    }

    /// Layout blocks carry no respondent data and are never kept in the removed-properties ledger
    pub fn is_system_managed(&self) -> bool {
        matches!(self, PropertyKind::Block(_))
    }
}

/// Where a select property gets its option list from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoFillSource {
    Static,
    Store,
    /// Unrecognised directives are carried verbatim and ignored
    Other(String),
}

impl AutoFillSource {
    pub fn as_str(&self) -> &str {
        match self {
            AutoFillSource::Static => "static",
            AutoFillSource::Store => "store",
            AutoFillSource::Other(s) => s,
        }
    }
}

impl From<String> for AutoFillSource {
    fn from(s: String) -> Self {
        match s.as_str() {
            "static" => AutoFillSource::Static,
            "store" => AutoFillSource::Store,
            _ => AutoFillSource::Other(s),
        }
    }
}

/// A single field definition within a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PropertyRecord", into = "PropertyRecord")]
pub struct Property {
    pub id: String,
    pub name: String,
    pub kind: PropertyKind,
    pub required: bool,
    pub hidden: bool,
    pub is_rating: bool,
    pub rating_max_value: Option<i64>,
    pub logic: Option<Value>,
    pub auto_fill_data: Option<AutoFillSource>,
    /// Presentation attributes (help, placeholder, width...) passed through untouched
    pub attributes: Map<String, Value>,
}

impl Property {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: PropertyKind) -> Self {
        let is_rating = matches!(kind, PropertyKind::Rating);
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            required: false,
            hidden: false,
            is_rating,
            rating_max_value: None,
            logic: None,
            auto_fill_data: None,
            attributes: Map::new(),
        }
    }

    /// Decode one element of a `properties` array. `index` labels the error when the id is missing.
    pub fn from_value(value: Value, index: usize) -> FormResult<Self> {
        let label = value
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("properties.{}", index));

        let record: PropertyRecord = serde_json::from_value(value)
            .map_err(|e| FormError::invalid_property(label.clone(), e.to_string()))?;

        Property::try_from(record).map_err(|err| match err {
            FormError::Validation {
                property_id: None,
                message,
            } => FormError::invalid_property(label, message),
            other => other,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(PropertyRecord::from(self.clone())).unwrap_or(Value::Null)
    }

    pub fn is_rating(&self) -> bool {
        self.is_rating || matches!(self.kind, PropertyKind::Rating)
    }

    pub fn is_system_managed(&self) -> bool {
        self.kind.is_system_managed()
    }

    /// Logic counts only when it actually carries conditions
    pub fn has_conditional_logic(&self) -> bool {
        match &self.logic {
            None | Some(Value::Null) => false,
            Some(Value::Object(map)) => match map.get("conditions") {
                Some(conditions) => !is_empty_value(conditions),
                None => !map.is_empty(),
            },
            Some(other) => !is_empty_value(other),
        }
    }

    pub fn options(&self) -> Option<&[SelectOption]> {
        match &self.kind {
            PropertyKind::Select(list) | PropertyKind::MultiSelect(list) => Some(&list.options),
            _ => None,
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Flat wire shape of a property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PropertyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    hidden: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_rating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating_max_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logic: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_fill_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_upload: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    select: Option<OptionList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multi_select: Option<OptionList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale_min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale_max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale_step_value: Option<f64>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl TryFrom<PropertyRecord> for Property {
    type Error = FormError;

    fn try_from(mut record: PropertyRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .take()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| FormError::validation("Property is missing an id"))?;

        let type_name = record
            .kind
            .take()
            .ok_or_else(|| FormError::invalid_property(&id, "Property is missing a type"))?;

        let kind = decode_kind(&type_name, &mut record, &id)?;

        // Rating scales are fixed by the cleaner, so an unreadable value is dropped rather than rejected
        let rating = record.is_rating || matches!(kind, PropertyKind::Rating);
        let rating_max_value = match record.rating_max_value.take() {
            None | Some(Value::Null) => None,
            Some(raw) if rating => parse_integer(&raw),
            Some(raw) => Some(parse_integer(&raw).ok_or_else(|| {
                FormError::invalid_property(&id, "rating_max_value must be an integer")
            })?),
        };

        let logic = record.logic.take().filter(|l| !l.is_null());

        // Kind data that does not belong to the decoded kind is kept as a plain attribute
        let mut attributes = record.attributes;
        if let Some(select) = record.select.take() {
            attributes.insert("select".into(), serde_json::to_value(select).unwrap_or(Value::Null));
        }
        if let Some(multi_select) = record.multi_select.take() {
            attributes.insert(
                "multi_select".into(),
                serde_json::to_value(multi_select).unwrap_or(Value::Null),
            );
        }

        Ok(Property {
            id,
            name: record.name.unwrap_or_default(),
            is_rating: rating,
            kind,
            required: record.required,
            hidden: record.hidden,
            rating_max_value,
            logic,
            auto_fill_data: record.auto_fill_data.map(AutoFillSource::from),
            attributes,
        })
    }
}

fn decode_kind(type_name: &str, record: &mut PropertyRecord, id: &str) -> FormResult<PropertyKind> {
    let missing = |key: &str| {
        FormError::invalid_property(id, format!("Property of type '{}' requires a '{}' object", type_name, key))
    };

    let kind = match type_name {
        "text" => PropertyKind::Text,
        "email" => PropertyKind::Email,
        "phone_number" => PropertyKind::PhoneNumber,
        "number" => PropertyKind::Number,
        "date" => PropertyKind::Date,
        "checkbox" => PropertyKind::Checkbox,
        "url" => PropertyKind::Url {
            file_upload: record.file_upload.take().unwrap_or(false),
        },
        "select" => PropertyKind::Select(record.select.take().ok_or_else(|| missing("select"))?),
        "multi_select" => {
            PropertyKind::MultiSelect(record.multi_select.take().ok_or_else(|| missing("multi_select"))?)
        }
        "rating" => PropertyKind::Rating,
        "scale" => {
            let scale = ScaleConfig {
                min_value: record.scale_min_value.take(),
                max_value: record.scale_max_value.take(),
                step_value: record.scale_step_value.take(),
            };
            if let (Some(min), Some(max)) = (scale.min_value, scale.max_value) {
                if min >= max {
                    return Err(FormError::invalid_property(
                        id,
                        "scale_min_value must be lower than scale_max_value",
                    ));
                }
            }
            PropertyKind::Scale(scale)
        }
        "files" => PropertyKind::Files {
            multiple: record.multiple.take().unwrap_or(false),
        },
        "signature" => PropertyKind::Signature,
        other => match BlockKind::from_wire(other) {
            Some(block) => PropertyKind::Block(block),
            None => {
                return Err(FormError::invalid_property(
                    id,
                    format!("Unknown property type '{}'", other),
                ))
            }
        },
    };

    Ok(kind)
}

fn parse_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<Property> for PropertyRecord {
    fn from(property: Property) -> Self {
        let mut record = PropertyRecord {
            id: Some(property.id),
            name: Some(property.name),
            kind: Some(property.kind.type_name().to_string()),
            required: property.required,
            hidden: property.hidden,
            is_rating: property.is_rating,
            rating_max_value: property.rating_max_value.map(Value::from),
            logic: property.logic,
            auto_fill_data: property.auto_fill_data.map(|s| s.as_str().to_string()),
            attributes: property.attributes,
            ..Default::default()
        };

        match property.kind {
            PropertyKind::Url { file_upload } => record.file_upload = Some(file_upload),
            PropertyKind::Files { multiple } => record.multiple = Some(multiple),
            PropertyKind::Select(list) => {
                record.attributes.remove("select");
                record.select = Some(list);
            }
            PropertyKind::MultiSelect(list) => {
                record.attributes.remove("multi_select");
                record.multi_select = Some(list);
            }
            PropertyKind::Scale(scale) => {
                record.scale_min_value = scale.min_value;
                record.scale_max_value = scale.max_value;
                record.scale_step_value = scale.step_value;
            }
            _ => {}
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_select_with_options() {
        let prop = Property::from_value(
            json!({
                "id": "p1",
                "name": "Company",
                "type": "select",
                "select": { "options": [{ "name": "Acme", "value": "ACM" }] },
                "auto_fill_data": "store",
                "help": "Pick one"
            }),
            0,
        )
        .unwrap();

        assert_eq!(prop.options().unwrap(), &[SelectOption::new("Acme", "ACM")]);
        assert_eq!(prop.auto_fill_data, Some(AutoFillSource::Store));
        assert_eq!(prop.attributes.get("help"), Some(&json!("Pick one")));
    }

    #[test]
    fn select_without_sub_structure_is_rejected_with_id() {
        let err = Property::from_value(json!({"id": "p9", "name": "X", "type": "select"}), 3).unwrap_err();
        match err {
            FormError::Validation { property_id, .. } => assert_eq!(property_id.as_deref(), Some("p9")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = Property::from_value(json!({"id": "p1", "name": "X", "type": "hologram"}), 0).unwrap_err();
        assert!(err.to_string().contains("hologram"));
    }

    #[test]
    fn missing_id_is_labelled_by_index() {
        let err = Property::from_value(json!({"name": "X", "type": "text"}), 4).unwrap_err();
        match err {
            FormError::Validation { property_id, .. } => {
                assert_eq!(property_id.as_deref(), Some("properties.4"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blocks_are_system_managed() {
        let prop = Property::from_value(json!({"id": "b1", "name": "Intro", "type": "nf-text"}), 0).unwrap();
        assert!(prop.is_system_managed());
        assert_eq!(prop.to_value()["type"], json!("nf-text"));
    }

    #[test]
    fn rating_kind_implies_rating_flag() {
        let prop = Property::from_value(
            json!({"id": "r1", "name": "Stars", "type": "rating", "rating_max_value": "8"}),
            0,
        )
        .unwrap();
        assert!(prop.is_rating());
        assert_eq!(prop.rating_max_value, Some(8));
    }

    #[test]
    fn non_rating_fields_still_need_an_integer_scale() {
        let err = Property::from_value(
            json!({"id": "n1", "name": "Count", "type": "number", "rating_max_value": "ten"}),
            0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("rating_max_value"));
    }

    #[test]
    fn wire_shape_survives_encoding() {
        let input = json!({
            "id": "u1",
            "name": "Website",
            "type": "url",
            "file_upload": true,
            "required": true,
            "hidden": false,
            "placeholder": "https://"
        });
        let prop = Property::from_value(input.clone(), 0).unwrap();
        assert_eq!(prop.to_value(), input);
    }

    #[test]
    fn empty_logic_is_not_conditional() {
        let mut prop = Property::new("t1", "Name", PropertyKind::Text);
        prop.logic = Some(json!({"conditions": null, "actions": []}));
        assert!(!prop.has_conditional_logic());
        prop.logic = Some(json!({"conditions": {"operatorIdentifier": "and", "children": []}, "actions": ["hide-block"]}));
        assert!(prop.has_conditional_logic());
    }
}
