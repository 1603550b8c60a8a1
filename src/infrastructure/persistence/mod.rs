//! Repository implementations.
//!
//! PostgreSQL repositories use runtime-checked `sqlx` queries. The in-memory
//! repositories provide the same contract inside one process and back the
//! `memory` storage backend and the HTTP tests.

pub mod memory_expert_repository;
pub mod memory_token_repository;
pub mod pg_expert_repository;
pub mod pg_token_repository;

pub use memory_expert_repository::InMemoryExpertRepository;
pub use memory_token_repository::InMemoryTokenRepository;
pub use pg_expert_repository::PgExpertRepository;
pub use pg_token_repository::PgTokenRepository;
