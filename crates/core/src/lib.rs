//! Core business logic for clipstream.

pub mod services;

pub use services::*;
