pub mod fixture;
pub mod http;
pub mod traits;

pub use fixture::FixtureSource;
pub use http::HttpStatsSource;
pub use traits::StatsSource;
