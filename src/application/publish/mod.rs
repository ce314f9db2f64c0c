//! Draft/publish converters, one per aggregate.
//!
//! Both services share the same three transitions: create a draft from the
//! published side (deep copy, idempotent guard), publish a draft (create new
//! or replace-in-place with retirement of the superseded content), and the
//! deletes. Draft content is never mutated by any transition.

mod blog;
mod creations;

pub use blog::BlogPublishService;
pub use creations::CreationPublishService;
