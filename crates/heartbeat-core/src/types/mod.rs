//! Validated identifier types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod api_url;
mod task_id;

pub use api_url::ApiUrl;
pub use task_id::TaskId;
