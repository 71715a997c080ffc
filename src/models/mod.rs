//! Data models mirroring the StudentLearn backend's JSON schemas.
//!
//! - `Identity`: the resolved user profile from `/auth/me`
//! - `Course`, `Enrollment`: library and enrollment entities
//! - `PracticeQuestion`: practice-test content

pub mod course;
pub mod user;

pub use course::{Course, Enrollment, PracticeQuestion};
pub use user::Identity;
