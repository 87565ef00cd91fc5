//! Outbound and inbound adapters: SQLite persistence and the HTTP API.

pub mod http;
pub mod sqlite;
