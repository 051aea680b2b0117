//! # Stockroom API
//!
//! REST surface over the catalog store and the recommender. Handlers are thin:
//! they validate input, call into [`stockroom_storage`] / [`stockroom_core`], and
//! shape JSON responses.

pub mod rest;
pub mod state;

pub use rest::{configure, RestApi};
pub use state::AppState;
