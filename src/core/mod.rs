//! Core logic of the console.
//!
//! This module provides:
//! - [`api`] - the typed card-flip API client
//! - [`guard`] - the navigation authorization gate
//! - [`session`] - the persisted token registry

pub mod api;
pub mod error;
pub mod guard;
pub mod session;
