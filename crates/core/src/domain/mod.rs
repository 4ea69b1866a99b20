pub mod analytics;
pub mod filters;
pub mod pagination;
pub mod stock;
pub mod system;
