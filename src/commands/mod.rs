//! Tauri command handlers

pub mod config;
pub mod download;
pub mod system;
