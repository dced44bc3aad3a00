//! Media Renamer - canonical capture-time names for photos and videos
//!
//! This library renames media files to `YYYY-MM-DD HH-MM-SS.ext` with:
//! - Vendor filename pattern recognition (Android, Samsung)
//! - EXIF metadata extraction for still images
//! - File system modification time fallback
//! - Collision-safe, idempotent renaming
//! - Parallel inspection with Rayon

pub mod cli;
pub mod config;
pub mod error;
pub mod ordered;
pub mod process;
pub mod rename;
pub mod time;

pub use cli::{Cli, Command};
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use ordered::Renumberer;
pub use process::{FileResult, ProcessingStatus, Processor};
pub use rename::{RenameDecision, Resolver};
