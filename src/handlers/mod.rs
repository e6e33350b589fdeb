// handlers/mod.rs - two security tiers
//
// Public (no auth): service info, health, form asset links
// Protected (JWT auth): everything under /api

pub mod protected;
pub mod public;
