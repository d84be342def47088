pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;

pub use routes::vault_routes;
