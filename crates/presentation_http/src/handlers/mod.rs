//! HTTP request handlers

pub mod calendars;
pub mod companies;
pub mod health;
pub mod webhooks;
