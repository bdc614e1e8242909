//! Database query modules.
//!
//! - categories: category lookup-or-insert for the normalized layout
//! - items: item insert and listing for both layouts

pub mod categories;
pub mod items;
