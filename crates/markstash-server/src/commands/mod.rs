//! Command handlers

pub mod config;
