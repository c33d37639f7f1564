//! Domain operations that are more than single-table CRUD: quiz grading
//! and the duplicate-guarded enrollment/submission writes. Each operation
//! runs inside one transaction taken from the `ModelManager`.

mod error;
pub use error::{ServiceError, ServiceResult};

pub mod enrollment;
pub mod quiz;
pub mod submission;
