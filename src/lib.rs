//! Plant Registry
//!
//! HTTP resource API over plant records and the institutions that own them.
//! Handlers are generic over [`model::Resource`] and talk to storage through
//! the [`store::Collection`] trait.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod security;
pub mod store;
