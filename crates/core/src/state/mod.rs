pub mod analytics;
pub mod detail;
pub mod list;
pub mod recommendations;
pub mod stocks;
pub mod system;

pub use list::{ListSource, ListStore, StoreOptions};
