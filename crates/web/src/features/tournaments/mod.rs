pub mod handlers;
pub mod routes;
pub(crate) mod services;
