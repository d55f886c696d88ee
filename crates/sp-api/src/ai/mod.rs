pub mod client;
pub mod parse;
pub mod routes;

pub use routes::routes;
