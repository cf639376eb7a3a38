pub mod pages_hooks;
pub mod pages_service;
pub mod pages_shared;

pub use pages_service::PagesService;
