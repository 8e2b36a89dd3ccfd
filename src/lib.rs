#![doc = "The `todolist` library crate."]
#![doc = ""]
#![doc = "Multi-tenant todo lists: users register and log in, then manage their own todos"]
#![doc = "and categories. Sessions are HS256 tokens in an HTTP-only cookie, checked by the"]
#![doc = "`SessionGuard` middleware for pages and by the `AuthenticatedUser` extractor for"]
#![doc = "every API handler. Every data query is scoped to the caller."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::error::AppError;
