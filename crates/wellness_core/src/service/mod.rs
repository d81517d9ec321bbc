//! Dashboard features.
//!
//! # Responsibility
//! - Hold per-feature session state and validate user input.
//! - Keep UI/FFI layers decoupled from storage and rule details.

pub mod chat_service;
pub mod dashboard;
pub mod meal_service;
pub mod mood_service;
pub mod relative_time;
pub mod symptom_service;
