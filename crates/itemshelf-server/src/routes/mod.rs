//! Route handlers for the HTTP API.

pub mod hello;
pub mod images;
pub mod items;
