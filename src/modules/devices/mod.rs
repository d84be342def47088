pub mod controller;
pub mod routes;
pub mod schema;
pub mod service;

pub use routes::devices_routes;
