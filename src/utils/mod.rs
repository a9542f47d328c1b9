//! Shared utilities.

pub mod sockfile;
