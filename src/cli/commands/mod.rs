pub mod clean;
pub mod features;
pub mod migrate;
pub mod token;
