mod student;

pub use student::{FeeCategory, Gender, Student, StudentRecord, StudentType, UnknownVariant, YesNo};
