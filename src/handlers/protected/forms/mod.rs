pub mod collection;
pub mod files;
pub mod record;

// Re-export handler functions for use in routing
pub use collection::{index, index_all, store};
pub use files::{upload_asset, view_file};
pub use record::{destroy, duplicate, regenerate_link, update};
