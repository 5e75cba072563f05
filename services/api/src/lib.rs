//! services/api/src/lib.rs
//!
//! HTTP and GraphQL surface of the todo service.

pub mod adapters;
pub mod config;
pub mod error;
pub mod graph;
pub mod web;
