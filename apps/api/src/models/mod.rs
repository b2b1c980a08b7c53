pub mod draft;
pub mod feedback;
pub mod lenient;
pub mod resume;
pub mod sections;
