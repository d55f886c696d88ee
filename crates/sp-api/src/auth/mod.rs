pub mod jwt;
pub mod middleware;

pub use jwt::{create_jwt_token, verify_jwt_token};
pub use middleware::AuthUser;
