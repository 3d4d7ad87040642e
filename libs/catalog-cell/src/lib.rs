pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CatalogError, DiagnosticCategory, DiagnosticTest, Doctor, Gender, Specialty};
pub use services::{CatalogService, SeedService};
