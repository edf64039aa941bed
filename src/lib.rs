//! Back-Office API Library
//!
//! This library exports the core modules for the back-office auth server.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
