// Library exports for the CodeLeap Network client.
// The binary and the integration tests both build on these modules.

pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod sync;
pub mod view;
