//! Notelet - A minimal personal notes backend
//!
//! This library provides the core functionality for the Notelet service.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;
