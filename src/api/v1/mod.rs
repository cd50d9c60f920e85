/*
 * Responsibility
 * - Entry point of the HTTP surface (routes() re-export)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
