//! Resource representations exchanged with the backend.
//!
//! These mirror the backend's response schemas; the client stores them as
//! received and does not apply business rules of its own.

mod task;
mod token;
mod user;

pub use task::{NewTask, Page, Task, TaskUpdate};
pub use token::TokenPair;
pub use user::{PartnerInfo, Registration, User};
