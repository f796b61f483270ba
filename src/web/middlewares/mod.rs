mod auth;
pub use auth::{AUTH_TOKEN, extract_context_fn, removal_cookie, session_cookie};
