pub mod catalog;
pub mod seed;

pub use catalog::CatalogService;
pub use seed::SeedService;
