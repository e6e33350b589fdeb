// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route Prefix: no /api prefix (/, /health, /forms/assets/*, /storage/*)
// Middleware: none

pub mod assets;
pub mod storage;
pub mod system;

pub use assets::show_asset;
pub use storage::download;
pub use system::{health, root};
