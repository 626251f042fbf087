#![forbid(unsafe_code)]

//! banner-tools — Banner API command-line client.
//!
//! Library entry point exposing identifier resolution and the API client.
//! The binary (`main.rs`) is a thin CLI wrapper around this library.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod resolver;
