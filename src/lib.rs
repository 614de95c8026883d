//! Query API over precomputed game-platform datasets
//!
//! Six read-only queries (developer activity, user summaries, genre
//! champions, yearly developer rankings, review analysis and game
//! recommendations) run against tables held by a load-once [`store::Catalog`].
//! The [`api`] module serves them over HTTP and owns all display formatting.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
