pub mod tenants_hooks;
pub mod tenants_service;
pub mod tenants_shared;

pub use tenants_service::TenantsService;
