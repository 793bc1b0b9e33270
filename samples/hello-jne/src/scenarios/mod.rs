pub mod processes;
pub mod resume;
