// Form definition and cleaning pipeline
//
// request  -> typed FormData from a raw payload
// cleaner  -> strips features the workspace is not entitled to (pure)
// auto_fill -> option lists sourced from the workspace record store
// ledger   -> history of fields removed on update

pub mod auto_fill;
pub mod cleaner;
pub mod entitlement;
pub mod error;
pub mod form;
pub mod ledger;
pub mod property;
pub mod request;
pub mod slug;

pub use cleaner::{simulate, CleanedForm, Cleaning, CleaningReport};
pub use entitlement::{permitted_features, FeatureFlag, WorkspaceEntitlement};
pub use error::{FormError, FormResult};
pub use form::{FormData, FormDefinition, FormSettings, Visibility};
pub use property::{AutoFillSource, BlockKind, OptionList, Property, PropertyKind, SelectOption};
pub use request::FormRequest;
