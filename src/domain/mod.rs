//! Core domain types and logic.

pub mod aggregate;
pub mod config_validation;
pub mod error;
pub mod forecast;
pub mod polyfit;
pub mod sales;
pub mod selection;
