//! # MealHub Shared
//!
//! Request/response types shared by the server and API clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, ErrorSource, PageMeta};
