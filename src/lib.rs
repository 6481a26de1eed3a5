//! Recipebook Library
//!
//! Core functionality for the recipe catalog service.

pub mod api;
pub mod build_info;
pub mod config;
pub mod db;
pub mod external;
pub mod models;
pub mod nutrition;
