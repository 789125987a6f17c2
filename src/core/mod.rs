//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Error types
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Path normalization utilities
//! - Common utilities
//! - Source loading

pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
