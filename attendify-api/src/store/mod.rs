//! Storage operations for the Attendify service
//!
//! Each submodule owns one concern: the student/teacher roster, the
//! session registry, and the attendance submission and aggregation
//! engines. Handlers stay thin; every invariant lives here.

pub mod attendance;
pub mod roster;
pub mod sessions;
