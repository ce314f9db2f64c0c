//! Application services layer scaffolding.

pub mod content;
pub mod error;
pub mod publish;
pub mod repos;
