pub mod aggregations;
pub mod config;
pub mod error;
pub mod model;
pub mod session;

pub use aggregations::{aggregate, AggregatedRow, AggregationOptions, CategoryCounts, RoomTable};
pub use config::Config;
pub use error::{Error, PipelineError, Result, ValidationError};
pub use model::{Category, CategoryDimension, RawCountRecord, RealEstateKind, RecordDecoder};
pub use session::{DashboardSession, RequestTicket, ViewKey};
