pub mod attendance;
pub mod core;
pub mod dashboard;
pub mod exams;
pub mod fees;
pub mod marks;
pub mod notices;
pub mod session;
pub mod students;
