//! Services for the user state.

pub mod persistence;
pub mod user_context;

pub use persistence::PersistenceQueue;
pub use user_context::UserContext;
