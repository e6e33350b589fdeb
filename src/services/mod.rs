pub mod form_service;
pub mod workspace_helper;

pub use form_service::{FormOutcome, FormService, FormServiceSettings, FormView, UploadAssetRequest, UploadedAsset};
pub use workspace_helper::WorkspaceHelper;
