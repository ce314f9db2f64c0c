//! Draft/publish content-versioning core for a portfolio backend.
//!
//! Blog posts and creations each exist in two variants, a published record
//! and an editable draft, both carrying an ordered list of polymorphic
//! content blocks (markdown, gallery, video). The application layer exposes
//! block CRUD plus the two transitions between the variants: drafting a
//! published record deep-copies its blocks, and publishing a draft either
//! creates a fresh published record or atomically replaces the existing one
//! while retiring its old block trees.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
