pub mod handlers;
pub mod repository;
pub mod sections;
pub mod service;
pub mod validation;

pub use service::ResumeService;
