//! # MealHub Core
//!
//! The domain layer of the MealHub backend.
//! This crate contains entities, ports and services with zero infrastructure
//! dependencies. Storage and authentication are plugged in through the traits
//! in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

pub use error::{DomainError, RepoError};
