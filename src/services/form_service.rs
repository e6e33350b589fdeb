use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Actor;
use crate::database::models::Workspace;
use crate::database::{FormRepository, Page, RecordStore, WorkspaceRepository};
use crate::forms::auto_fill::resolve_all;
use crate::forms::ledger;
use crate::forms::slug::generate_slug;
use crate::forms::{simulate, CleaningReport, FormDefinition, FormError, FormRequest, FormResult};
use crate::policy::{authorize, FormAbility, FormPolicy};
use crate::storage::{submission_path, validate_asset, BlobStorage, StorageError, UploadToken, ASSETS_UPLOAD_PATH};

const SLUG_ATTEMPTS: usize = 5;

/// A form as returned to clients, with the context the UI needs
#[derive(Debug, Clone)]
pub struct FormView {
    pub form: FormDefinition,
    pub workspace_is_pro: bool,
    pub user_is_owner: bool,
    pub cleanings: CleaningReport,
}

/// Result of a mutating operation
#[derive(Debug, Clone)]
pub struct FormOutcome {
    pub message: String,
    pub form: Option<FormView>,
    /// Only set on create
    pub users_first_form: Option<bool>,
}

impl FormOutcome {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            form: None,
            users_first_form: None,
        }
    }

    fn with_form(message: impl Into<String>, form: FormView) -> Self {
        Self {
            message: message.into(),
            form: Some(form),
            users_first_form: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadAssetRequest {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub upload_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub message: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOption {
    Slug,
    Uuid,
}

impl std::str::FromStr for LinkOption {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slug" => Ok(LinkOption::Slug),
            "uuid" => Ok(LinkOption::Uuid),
            other => Err(FormError::validation(format!(
                "Unknown link option '{}', expected 'slug' or 'uuid'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormServiceSettings {
    pub page_size: u32,
    pub front_url: String,
    pub app_url: String,
    pub max_asset_bytes: u64,
    pub temporary_url_ttl: Duration,
}

impl FormServiceSettings {
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self {
            page_size: config.forms.page_size,
            front_url: config.forms.front_url.clone(),
            app_url: config.forms.app_url.clone(),
            max_asset_bytes: config.storage.max_asset_bytes,
            temporary_url_ttl: Duration::seconds(config.storage.temporary_url_ttl_secs),
        }
    }
}

/// Form operations behind the HTTP surface. Every operation authorizes first.
pub struct FormService {
    forms: Arc<dyn FormRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    records: Arc<dyn RecordStore>,
    storage: Arc<dyn BlobStorage>,
    policy: Arc<dyn FormPolicy>,
    settings: FormServiceSettings,
}

impl FormService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        records: Arc<dyn RecordStore>,
        storage: Arc<dyn BlobStorage>,
        policy: Arc<dyn FormPolicy>,
        settings: FormServiceSettings,
    ) -> Self {
        Self {
            forms,
            workspaces,
            records,
            storage,
            policy,
            settings,
        }
    }

    pub fn settings(&self) -> &FormServiceSettings {
        &self.settings
    }

    pub fn share_url(&self, form: &FormDefinition) -> String {
        form.share_url(&self.settings.front_url)
    }

    /// Forms of one workspace, most recently updated first, with simulated cleanings
    pub async fn index(&self, actor: &Actor, workspace_id: Uuid, page: Option<u32>) -> FormResult<Page<FormView>> {
        let workspace = self.workspaces.find(workspace_id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::View, Some(workspace.id)).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::ViewAny, None).await?;

        let page = page.unwrap_or(1).max(1);
        let forms = self
            .forms
            .list_for_workspace(workspace.id, page, self.settings.page_size)
            .await?;

        Ok(forms.map(|form| {
            let cleanings = simulated_cleanings(&form, &workspace);
            FormView {
                form,
                workspace_is_pro: workspace.is_pro,
                user_is_owner: true,
                cleanings,
            }
        }))
    }

    /// Every form of every workspace the actor belongs to
    pub async fn index_all(&self, actor: &Actor) -> FormResult<Vec<FormView>> {
        let workspaces = self.workspaces.list_for_user(actor.user_id).await?;
        for workspace in &workspaces {
            authorize(self.policy.as_ref(), actor.user_id, FormAbility::View, Some(workspace.id)).await?;
            authorize(self.policy.as_ref(), actor.user_id, FormAbility::ViewAny, None).await?;
        }

        let ids: Vec<Uuid> = workspaces.iter().map(|w| w.id).collect();
        let is_pro: HashMap<Uuid, bool> = workspaces.iter().map(|w| (w.id, w.is_pro)).collect();

        let forms = self.forms.list_for_workspaces(&ids).await?;
        Ok(forms
            .into_iter()
            .map(|form| FormView {
                workspace_is_pro: is_pro.get(&form.workspace_id).copied().unwrap_or(false),
                user_is_owner: true,
                cleanings: CleaningReport::default(),
                form,
            })
            .collect())
    }

    pub async fn store(&self, actor: &Actor, payload: Value) -> FormResult<FormOutcome> {
        let request = FormRequest::from_value(payload)?;
        let workspace_id = request.require_workspace()?;

        authorize(self.policy.as_ref(), actor.user_id, FormAbility::Create, Some(workspace_id)).await?;
        let workspace = self.workspaces.find(workspace_id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::View, Some(workspace.id)).await?;

        let cleaned = simulate(&request.data, &workspace.entitlement())?;
        let mut data = cleaned.data;
        data.properties = resolve_all(data.properties, workspace.id, self.records.as_ref()).await?;

        let slug = self.unique_slug(&data.title).await?;
        let form = self
            .forms
            .create(FormDefinition::new(workspace.id, actor.user_id, slug, data))
            .await?;

        let users_first_form = self.forms.count_by_creator(actor.user_id).await? == 1;

        tracing::info!(
            "Created form {} in workspace {} ({} cleaning(s))",
            form.id,
            workspace.id,
            cleaned.report.len()
        );

        let message = mutation_message("created", &cleaned.report, form.is_draft());
        Ok(FormOutcome {
            message,
            form: Some(FormView {
                form,
                workspace_is_pro: workspace.is_pro,
                user_is_owner: true,
                cleanings: cleaned.report,
            }),
            users_first_form: Some(users_first_form),
        })
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: Value) -> FormResult<FormOutcome> {
        let existing = self.find_form(id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::Update, Some(existing.workspace_id)).await?;

        let request = FormRequest::from_value(payload)?;
        let workspace = self.workspaces.find(existing.workspace_id).await?;

        let cleaned = simulate(&request.data, &workspace.entitlement())?;
        let mut data = cleaned.data;
        data.properties = resolve_all(data.properties, workspace.id, self.records.as_ref()).await?;

        let removed = ledger::reconcile(&existing, &data.properties);
        if !removed.is_empty() {
            tracing::debug!("Form {}: {} field(s) moved to the removed ledger", id, removed.len());
        }

        let mut form = existing.clone();
        form.removed_properties = ledger::merge(&existing.removed_properties, removed);
        form.data = data;
        let form = self.forms.update(id, form).await?;

        tracing::info!("Updated form {} ({} cleaning(s))", form.id, cleaned.report.len());

        let message = mutation_message("updated", &cleaned.report, form.is_draft());
        Ok(FormOutcome::with_form(
            message,
            FormView {
                form,
                workspace_is_pro: workspace.is_pro,
                user_is_owner: true,
                cleanings: cleaned.report,
            },
        ))
    }

    pub async fn destroy(&self, actor: &Actor, id: Uuid) -> FormResult<FormOutcome> {
        let form = self.find_form(id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::Delete, Some(form.workspace_id)).await?;

        self.forms.delete(form.id).await?;
        tracing::info!("Deleted form {}", form.id);
        Ok(FormOutcome::message("Form was deleted."))
    }

    pub async fn duplicate(&self, actor: &Actor, id: Uuid) -> FormResult<FormOutcome> {
        let form = self.find_form(id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::Update, Some(form.workspace_id)).await?;

        let slug = self.unique_slug(&form.data.title).await?;
        let copy = self.forms.create(form.duplicate(slug)).await?;
        tracing::info!("Duplicated form {} as {}", form.id, copy.id);

        let view = self.plain_view(copy).await?;
        Ok(FormOutcome::with_form("Form successfully duplicated.", view))
    }

    pub async fn regenerate_link(&self, actor: &Actor, id: Uuid, option: &str) -> FormResult<FormOutcome> {
        let mut form = self.find_form(id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::Update, Some(form.workspace_id)).await?;

        form.slug = match option.parse::<LinkOption>()? {
            LinkOption::Slug => self.unique_slug(&form.data.title).await?,
            LinkOption::Uuid => Uuid::new_v4().to_string(),
        };
        let form = self.forms.update(id, form).await?;

        let message = format!(
            "Form url successfully updated. Your new form url now is: {}.",
            self.share_url(&form)
        );
        let view = self.plain_view(form).await?;
        Ok(FormOutcome::with_form(message, view))
    }

    /// Claim a temporary upload as a form asset
    pub async fn upload_asset(&self, actor: &Actor, request: UploadAssetRequest) -> FormResult<UploadedAsset> {
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::ViewAny, None).await?;

        let raw = request
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| FormError::validation("The url field is required"))?;

        let token = UploadToken::parse(raw).map_err(upload_error)?;
        validate_asset(
            self.storage.as_ref(),
            &token,
            request.upload_type.as_deref(),
            self.settings.max_asset_bytes,
        )
        .await
        .map_err(upload_error)?;

        let moved_name = token.moved_file_name();
        self.storage
            .move_file(&token.tmp_path(), &format!("{}/{}", ASSETS_UPLOAD_PATH, moved_name))
            .await
            .map_err(storage_unavailable)?;

        tracing::info!("User {} uploaded form asset {}", actor.user_id, moved_name);
        Ok(UploadedAsset {
            message: "File uploaded.".to_string(),
            url: format!("{}/forms/assets/{}", self.settings.app_url.trim_end_matches('/'), moved_name),
        })
    }

    /// Temporary link to a stored asset. Public.
    pub async fn show_asset(&self, file_name: &str) -> FormResult<url::Url> {
        let path = format!("{}/{}", ASSETS_UPLOAD_PATH, file_name);
        self.temporary_link(&path).await
    }

    /// Temporary link to a file submitted through a form
    pub async fn view_file(&self, actor: &Actor, id: Uuid, file_name: &str) -> FormResult<url::Url> {
        let form = self.find_form(id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::View, Some(form.workspace_id)).await?;

        self.temporary_link(&submission_path(form.id, file_name)).await
    }

    /// Contents behind a link issued by `temporary_link`. Public; the signature is the credential.
    pub async fn signed_file(&self, path: &str, expires: i64, signature: &str) -> FormResult<Vec<u8>> {
        if !self.storage.verify(path, expires, signature, Utc::now()) {
            tracing::warn!("Rejected storage link for {}", path);
            return Err(FormError::forbidden("Invalid or expired link."));
        }
        match self.storage.read(path).await {
            Ok(contents) => Ok(contents),
            Err(StorageError::NotFound(_) | StorageError::InvalidPath(_)) => Err(FormError::not_found("File not found.")),
            Err(e) => Err(storage_unavailable(e)),
        }
    }

    async fn temporary_link(&self, path: &str) -> FormResult<url::Url> {
        let exists = match self.storage.exists(path).await {
            Ok(exists) => exists,
            Err(StorageError::InvalidPath(_)) => false,
            Err(e) => return Err(storage_unavailable(e)),
        };
        if !exists {
            return Err(FormError::not_found("File not found."));
        }
        Ok(self
            .storage
            .temporary_url(path, Utc::now() + self.settings.temporary_url_ttl)?)
    }

    async fn find_form(&self, id: Uuid) -> FormResult<FormDefinition> {
        Ok(self.forms.find(id).await?)
    }

    async fn plain_view(&self, form: FormDefinition) -> FormResult<FormView> {
        let workspace = self.workspaces.find(form.workspace_id).await?;
        Ok(FormView {
            form,
            workspace_is_pro: workspace.is_pro,
            user_is_owner: true,
            cleanings: CleaningReport::default(),
        })
    }

    async fn unique_slug(&self, title: &str) -> FormResult<String> {
        for _ in 0..SLUG_ATTEMPTS {
            let slug = generate_slug(title);
            if !self.forms.slug_exists(&slug).await? {
                return Ok(slug);
            }
        }
        Ok(Uuid::new_v4().to_string())
    }
}

fn simulated_cleanings(form: &FormDefinition, workspace: &Workspace) -> CleaningReport {
    match simulate(&form.data, &workspace.entitlement()) {
        Ok(cleaned) => cleaned.report,
        Err(e) => {
            tracing::warn!("Stored form {} failed simulation: {}", form.id, e);
            CleaningReport::default()
        }
    }
}

fn mutation_message(verb: &str, report: &CleaningReport, is_draft: bool) -> String {
    if !report.is_empty() {
        return format!(
            "Form successfully {}, but the Pro features you used will be disabled when sharing your form:",
            verb
        );
    }
    let mut message = format!("Form {}.", verb);
    if is_draft {
        message.push_str(" But other people won't be able to see the form since it's currently in draft mode");
    }
    message
}

fn upload_error(err: StorageError) -> FormError {
    match err {
        StorageError::InvalidUpload(message) => FormError::validation(message),
        StorageError::InvalidPath(path) => FormError::validation(format!("Invalid upload reference '{}'", path)),
        other => storage_unavailable(other),
    }
}

fn storage_unavailable(err: StorageError) -> FormError {
    tracing::error!("Blob storage failure: {}", err);
    FormError::StorageUnavailable("File storage is temporarily unavailable".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::StoreRecord;
    use crate::forms::{PropertyKind, Visibility};
    use crate::testing::{TestContext, APP_URL, FRONT_URL};
    use serde_json::json;

    fn payload(ctx: &TestContext, properties: Value) -> Value {
        json!({
            "workspace_id": ctx.workspace.id.to_string(),
            "title": "Customer survey",
            "visibility": "published",
            "properties": properties,
        })
    }

    fn service(ctx: &TestContext) -> Arc<FormService> {
        ctx.state().forms
    }

    #[test]
    fn messages_follow_cleaning_and_visibility() {
        let empty = CleaningReport::default();
        assert_eq!(mutation_message("created", &empty, false), "Form created.");
        assert_eq!(
            mutation_message("updated", &empty, true),
            "Form updated. But other people won't be able to see the form since it's currently in draft mode"
        );
    }

    #[test]
    fn link_options_parse() {
        assert_eq!("slug".parse::<LinkOption>().unwrap(), LinkOption::Slug);
        assert_eq!("uuid".parse::<LinkOption>().unwrap(), LinkOption::Uuid);
        assert!("random".parse::<LinkOption>().is_err());
    }

    #[tokio::test]
    async fn store_cleans_for_free_workspaces() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);

        let outcome = forms
            .store(
                &ctx.actor,
                payload(
                    &ctx,
                    json!([
                        {"id": "sig", "name": "Signature", "type": "signature"},
                        {"id": "stars", "name": "Stars", "type": "rating", "rating_max_value": 10},
                    ]),
                ),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.message,
            "Form successfully created, but the Pro features you used will be disabled when sharing your form:"
        );
        assert_eq!(outcome.users_first_form, Some(true));

        let view = outcome.form.unwrap();
        assert_eq!(view.cleanings.len(), 1);
        assert!(view.form.slug.starts_with("customer-survey-"));
        assert_eq!(view.form.creator_id, ctx.actor.user_id);
        assert_eq!(view.form.data.properties[0].kind, PropertyKind::Text);
        assert_eq!(view.form.data.properties[1].rating_max_value, Some(5));
    }

    #[tokio::test]
    async fn store_mentions_draft_and_counts_first_form_once() {
        let ctx = TestContext::new(true).await;
        let forms = service(&ctx);

        let mut draft = payload(&ctx, json!([{"id": "a", "name": "Email", "type": "email"}]));
        draft["visibility"] = json!("draft");

        let first = forms.store(&ctx.actor, draft.clone()).await.unwrap();
        assert_eq!(
            first.message,
            "Form created. But other people won't be able to see the form since it's currently in draft mode"
        );
        assert_eq!(first.users_first_form, Some(true));

        let second = forms.store(&ctx.actor, draft).await.unwrap();
        assert_eq!(second.users_first_form, Some(false));
    }

    #[tokio::test]
    async fn store_fills_select_options_from_the_record_store() {
        let ctx = TestContext::new(false).await;
        ctx.records.insert(ctx.workspace.id, StoreRecord::new("Downtown", "DT")).await;
        let forms = service(&ctx);

        let outcome = forms
            .store(
                &ctx.actor,
                payload(
                    &ctx,
                    json!([{
                        "id": "store",
                        "name": "Store",
                        "type": "select",
                        "auto_fill_data": "store",
                        "select": {"options": []}
                    }]),
                ),
            )
            .await
            .unwrap();

        let view = outcome.form.unwrap();
        let options = view.form.data.properties[0].options().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "DT");
    }

    #[tokio::test]
    async fn update_grows_the_removed_ledger() {
        let ctx = TestContext::new(true).await;
        let forms = service(&ctx);

        let created = forms
            .store(
                &ctx.actor,
                payload(
                    &ctx,
                    json!([
                        {"id": "a", "name": "A", "type": "text"},
                        {"id": "b", "name": "B", "type": "text"},
                        {"id": "c", "name": "Heading", "type": "nf-text"},
                    ]),
                ),
            )
            .await
            .unwrap();
        let id = created.form.unwrap().form.id;

        let updated = forms
            .update(&ctx.actor, id, payload(&ctx, json!([{"id": "a", "name": "A", "type": "text"}])))
            .await
            .unwrap();
        assert_eq!(updated.message, "Form updated.");
        let removed: Vec<_> = updated.form.unwrap().form.removed_properties.iter().map(|p| p.id.clone()).collect();
        assert_eq!(removed, vec!["b"]);

        let again = forms.update(&ctx.actor, id, payload(&ctx, json!([]))).await.unwrap();
        let removed: Vec<_> = again.form.unwrap().form.removed_properties.iter().map(|p| p.id.clone()).collect();
        assert_eq!(removed, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn update_reports_denied_conditional_logic() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);
        let id = forms
            .store(&ctx.actor, payload(&ctx, json!([{"id": "q", "name": "Q", "type": "text"}])))
            .await
            .unwrap()
            .form
            .unwrap()
            .form
            .id;

        let outcome = forms
            .update(
                &ctx.actor,
                id,
                payload(
                    &ctx,
                    json!([{
                        "id": "q",
                        "name": "Q",
                        "type": "text",
                        "logic": {"conditions": {"operatorIdentifier": "and", "children": [{}]}, "actions": ["hide-block"]}
                    }]),
                ),
            )
            .await
            .unwrap();

        assert!(outcome.message.starts_with("Form successfully updated, but the Pro features"));
        let view = outcome.form.unwrap();
        assert_eq!(view.cleanings.len(), 1);
        assert!(view.form.data.properties[0].logic.is_none());
    }

    #[tokio::test]
    async fn strangers_cannot_mutate() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);
        let id = forms
            .store(&ctx.actor, payload(&ctx, json!([])))
            .await
            .unwrap()
            .form
            .unwrap()
            .form
            .id;

        let stranger = TestContext::stranger();
        assert!(matches!(forms.destroy(&stranger, id).await, Err(FormError::Forbidden(_))));
        assert!(matches!(
            forms.update(&stranger, id, payload(&ctx, json!([]))).await,
            Err(FormError::Forbidden(_))
        ));
        assert!(matches!(
            forms.store(&stranger, payload(&ctx, json!([]))).await,
            Err(FormError::Forbidden(_))
        ));
        assert!(ctx.forms.find(id).await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_and_regenerate_change_the_slug() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);
        let original = forms
            .store(&ctx.actor, payload(&ctx, json!([{"id": "a", "name": "A", "type": "text"}])))
            .await
            .unwrap()
            .form
            .unwrap()
            .form;

        let copy = forms.duplicate(&ctx.actor, original.id).await.unwrap();
        assert_eq!(copy.message, "Form successfully duplicated.");
        let copy = copy.form.unwrap().form;
        assert_eq!(copy.data.title, "Copy of Customer survey");
        assert_ne!(copy.slug, original.slug);
        assert_eq!(copy.data.properties, original.data.properties);

        let regenerated = forms.regenerate_link(&ctx.actor, original.id, "uuid").await.unwrap();
        let form = regenerated.form.unwrap().form;
        assert!(Uuid::parse_str(&form.slug).is_ok());
        assert_eq!(
            regenerated.message,
            format!("Form url successfully updated. Your new form url now is: {}/forms/{}.", FRONT_URL, form.slug)
        );

        assert!(matches!(
            forms.regenerate_link(&ctx.actor, original.id, "bogus").await,
            Err(FormError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn index_pages_and_simulates_cleanings() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);

        let mut stored = FormDefinition::new(
            ctx.workspace.id,
            ctx.actor.user_id,
            "legacy".into(),
            crate::forms::FormData::new("Legacy"),
        );
        stored.data.visibility = Visibility::Published;
        stored.data.properties = vec![crate::forms::Property::new("s", "Sign", PropertyKind::Signature)];
        ctx.forms.create(stored).await.unwrap();

        let page = forms.index(&ctx.actor, ctx.workspace.id, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].cleanings.len(), 1);
        assert!(!page.items[0].workspace_is_pro);

        assert!(matches!(
            forms.index(&TestContext::stranger(), ctx.workspace.id, None).await,
            Err(FormError::Forbidden(_))
        ));
        let all = forms.index_all(&ctx.actor).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn upload_asset_moves_the_pending_file() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);
        let id = Uuid::new_v4();
        ctx.storage.put(&format!("tmp/{}", id), vec![0u8; 16]).await.unwrap();

        let uploaded = forms
            .upload_asset(
                &ctx.actor,
                UploadAssetRequest {
                    url: Some(format!("Company Logo_{}.png", id)),
                    upload_type: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(uploaded.message, "File uploaded.");
        assert_eq!(uploaded.url, format!("{}/forms/assets/company-logo_{}.png", APP_URL, id));
        assert!(ctx
            .storage
            .exists(&format!("assets/forms/company-logo_{}.png", id))
            .await
            .unwrap());

        let again = forms
            .upload_asset(
                &ctx.actor,
                UploadAssetRequest {
                    url: Some(format!("Company Logo_{}.png", id)),
                    upload_type: None,
                },
            )
            .await;
        assert!(matches!(again, Err(FormError::Validation { .. })));

        let missing_url = forms.upload_asset(&ctx.actor, UploadAssetRequest::default()).await;
        assert!(matches!(missing_url, Err(FormError::Validation { .. })));
    }

    #[tokio::test]
    async fn view_file_links_only_existing_submissions() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);
        let id = forms
            .store(&ctx.actor, payload(&ctx, json!([])))
            .await
            .unwrap()
            .form
            .unwrap()
            .form
            .id;

        let err = forms.view_file(&ctx.actor, id, "cv.pdf").await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: File not found.");

        ctx.storage
            .put(&submission_path(id, "cv.pdf"), b"pdf".to_vec())
            .await
            .unwrap();
        let url = forms.view_file(&ctx.actor, id, "cv.pdf").await.unwrap();
        assert!(url.path().ends_with(&format!("forms/{}/submissions/cv.pdf", id)));
        assert!(url.query().unwrap().contains("signature="));

        assert!(matches!(
            forms.view_file(&TestContext::stranger(), id, "cv.pdf").await,
            Err(FormError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn signed_file_serves_only_intact_links() {
        let ctx = TestContext::new(false).await;
        let forms = service(&ctx);
        ctx.storage.put("assets/forms/logo.png", b"png".to_vec()).await.unwrap();

        let url = forms.show_asset("logo.png").await.unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        let expires: i64 = pairs["expires"].parse().unwrap();
        let signature = pairs["signature"].as_str();

        let contents = forms.signed_file("assets/forms/logo.png", expires, signature).await.unwrap();
        assert_eq!(contents, b"png");

        assert!(matches!(
            forms.signed_file("assets/forms/other.png", expires, signature).await,
            Err(FormError::Forbidden(_))
        ));
        assert!(matches!(
            forms.signed_file("assets/forms/logo.png", expires + 60, signature).await,
            Err(FormError::Forbidden(_))
        ));

        ctx.storage.move_file("assets/forms/logo.png", "tmp/logo.png").await.unwrap();
        let err = forms.signed_file("assets/forms/logo.png", expires, signature).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: File not found.");
    }
}
