pub mod aggregate;
pub mod category;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod frame;
pub mod join_resolver;
pub mod loader;
pub mod report;
pub mod schema;
pub mod section;
pub mod tables;

pub use category::{CategoryMapping, CategoryNormalizer};
pub use config::AnalyticsConfig;
pub use dashboard::Dashboard;
pub use error::{RentalError, Result};
pub use filter::{FactFilter, FilterParams};
pub use join_resolver::JoinResolver;
pub use report::{DashboardReport, SectionOutcome, SectionReport, SectionResult};
pub use section::Section;
pub use tables::{DateBounds, DateLookup, RentalTables};
