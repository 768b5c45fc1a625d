// Adapters layer: concrete implementations for external systems.

pub mod rest_countries;
pub mod sqlite;
