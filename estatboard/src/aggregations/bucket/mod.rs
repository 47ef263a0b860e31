mod rooms;
mod unify;

pub use rooms::{aggregate, build_rows};
pub use unify::unite_buckets;
