pub mod form;
pub mod store_record;
pub mod workspace;

pub use form::FormRow;
pub use store_record::StoreRecord;
pub use workspace::{Workspace, WorkspaceMember};
