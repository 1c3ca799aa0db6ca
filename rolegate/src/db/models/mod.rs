//! Database record models.
//!
//! Database models are distinct from the API models in [`crate::api::models`], so storage and API
//! representations can evolve independently.

pub mod users;
