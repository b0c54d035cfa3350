//! Utility modules for tierdesk

pub mod colors;
pub mod tools;
