pub mod auth;

pub use auth::{jwt_auth, require_admin, require_client, AuthUser};
