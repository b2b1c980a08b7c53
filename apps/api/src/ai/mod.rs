pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod reshape;
pub mod score;
pub mod service;

pub use service::AiService;
