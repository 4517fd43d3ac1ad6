//! # Web API Handlers
//!
//! Request handlers grouped by endpoint family.

pub mod data;
pub mod health;
pub mod models;
pub mod tasks;
