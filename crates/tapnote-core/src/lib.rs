//! Core types and trait definitions for TapNote.
//!
//! This crate is free of database, media and HTTP dependencies. Every other
//! crate in the workspace depends on it.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod note;
pub mod options;
pub mod store;

pub use error::{Error, Result};
