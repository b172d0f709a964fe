//! Common utilities and shared types for clipstream.
//!
//! This crate provides foundational components used across all clipstream crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Identity**: Bearer-token verification boundary via [`IdentityProvider`]
//! - **Storage**: Media storage backends for uploaded files
//!
//! # Example
//!
//! ```no_run
//! use clipstream_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod identity;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use identity::{HttpIdentityProvider, IdentityClaims, IdentityProvider};
pub use storage::{
    LocalStorage, MediaKind, StorageBackend, StorageConfig, UploadedFile, generate_storage_key,
};
