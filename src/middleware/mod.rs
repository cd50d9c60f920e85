/*
 * Responsibility
 * - Public interface of the middleware layer
 * - auth: bearer token -> Principal in request extensions
 * - cors / http: cross-cutting transport concerns applied in app.rs
 */
pub mod auth;
pub mod cors;
pub mod http;
