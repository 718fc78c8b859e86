pub mod course_id;
pub mod cursor;
pub mod dedup;
pub mod row;

pub use course_id::{CourseId, InvalidCourseId};
pub use cursor::{CursorError, CursorKey};
pub use dedup::DedupTracker;
pub use row::{REQUIRED_HEADERS, RowError, ValidatedRow, validate_row};
