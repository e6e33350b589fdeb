// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware, which injects the `Actor` extension

pub mod forms;
pub mod workspaces;
