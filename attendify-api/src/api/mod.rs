//! HTTP API handlers for attendify-api

pub mod attendance;
pub mod error;
pub mod health;
pub mod live;
pub mod sessions;
pub mod students;
pub mod teachers;

pub use attendance::{bulk_delete_attendance, remove_attendance_record, submit_attendance};
pub use health::health_routes;
pub use live::{list_class_attendance, live_attendance};
pub use sessions::{close_session, create_session, get_session};
pub use students::{add_student, count_students, list_students, remove_student};
pub use teachers::{add_teacher, count_teachers, list_teachers, remove_teacher, teacher_login};
