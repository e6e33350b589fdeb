use serde_json::{json, Map, Value};

use crate::database::Page;
use crate::services::{FormOutcome, FormView};

/// Public wire format of a form:
/// { ...form fields, share_url, workspace_is_pro, user_is_owner, cleanings }
pub fn form_to_api_value(view: &FormView, front_url: &str) -> Value {
    let mut obj = match serde_json::to_value(&view.form) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            tracing::error!("Form {} did not serialize to an object", view.form.id);
            Map::new()
        }
    };

    obj.insert("share_url".into(), Value::String(view.form.share_url(front_url)));
    obj.insert("workspace_is_pro".into(), Value::Bool(view.workspace_is_pro));
    obj.insert("user_is_owner".into(), Value::Bool(view.user_is_owner));
    obj.insert("cleanings".into(), json!(view.cleanings));

    Value::Object(obj)
}

pub fn forms_to_api_values(views: &[FormView], front_url: &str) -> Vec<Value> {
    views.iter().map(|v| form_to_api_value(v, front_url)).collect()
}

/// Paginated listing: { data, meta: { current_page, per_page, total, last_page } }
pub fn page_to_api_value(page: &Page<FormView>, front_url: &str) -> Value {
    json!({
        "data": forms_to_api_values(&page.items, front_url),
        "meta": {
            "current_page": page.page,
            "per_page": page.per_page,
            "total": page.total,
            "last_page": page.last_page(),
        }
    })
}

/// Body of mutation responses. `form_key` is "form" or "new_form".
pub fn outcome_to_api_value(outcome: &FormOutcome, form_key: &str, front_url: &str) -> Value {
    let mut obj = Map::new();
    obj.insert("message".into(), Value::String(outcome.message.clone()));
    if let Some(view) = &outcome.form {
        obj.insert(form_key.into(), form_to_api_value(view, front_url));
    }
    if let Some(first) = outcome.users_first_form {
        obj.insert("users_first_form".into(), Value::Bool(first));
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{CleaningReport, FormData, FormDefinition};
    use uuid::Uuid;

    fn view() -> FormView {
        FormView {
            form: FormDefinition::new(Uuid::new_v4(), Uuid::new_v4(), "survey-1a2b3c".into(), FormData::new("Survey")),
            workspace_is_pro: false,
            user_is_owner: true,
            cleanings: CleaningReport::default(),
        }
    }

    #[test]
    fn form_resource_is_flat_with_context() {
        let value = form_to_api_value(&view(), "https://forms.test/");
        assert_eq!(value["title"], "Survey");
        assert_eq!(value["visibility"], "draft");
        assert_eq!(value["share_url"], "https://forms.test/forms/survey-1a2b3c");
        assert_eq!(value["workspace_is_pro"], false);
        assert_eq!(value["cleanings"], json!([]));
    }

    #[test]
    fn outcome_omits_absent_parts() {
        let deleted = FormOutcome {
            message: "Form was deleted.".into(),
            form: None,
            users_first_form: None,
        };
        assert_eq!(
            outcome_to_api_value(&deleted, "form", "https://forms.test"),
            json!({"message": "Form was deleted."})
        );
    }
}
