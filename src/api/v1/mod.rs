/*
 * Responsibility
 * - v1 public surface (routes(), extractors, handlers)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
