// Data transformation pipeline: raw CSV text -> records -> typed metrics ->
// filtered rows -> grouped aggregates -> severity-classified results

pub mod aggregate;
pub mod filter;
pub mod normalize;
pub mod parser;
pub mod severity;

pub use normalize::Metric;
pub use parser::RawRecord;
