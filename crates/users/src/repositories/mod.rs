//! Data access for the persisted aggregates.
//!
//! Repositories sit between the user context and the key-value store and
//! take care of schema envelopes and (de)serialization.

pub mod aggregate_repository;

pub use aggregate_repository::{Aggregate, AggregateRepository};
