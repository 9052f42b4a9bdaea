//! BookFlix catalog service
//!
//! Holds the book catalog, popularity ranking and precomputed recommendation
//! tables in memory and answers popular, correlation, content and search
//! queries, in-process through [`services::QueryEngine`] or over HTTP through
//! [`api::create_router`].

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
