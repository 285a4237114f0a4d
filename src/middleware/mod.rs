/*
 * Responsibility
 * - middleware public interface
 * - auth: ID token authentication, http: cross-cutting transport layers
 */
pub mod auth;
pub mod http;
