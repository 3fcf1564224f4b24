//! Core types and trait definitions for the folio contact pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The server, the store and the form client all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod envelope;
pub mod error;
pub mod message;
pub mod service;
pub mod store;
pub mod submission;
pub mod validate;

pub use error::{Error, Result};
