//! # Web API Middleware
//!
//! Middleware for the web API: bearer-token authentication and request id
//! generation. Layer ordering lives in [`crate::web::create_app`].

pub mod auth;
pub mod request_id;
