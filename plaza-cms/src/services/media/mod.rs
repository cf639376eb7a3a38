pub mod media_hooks;
pub mod media_service;
pub mod media_shared;

pub use media_service::media_service;
