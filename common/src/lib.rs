pub mod report;
pub mod table;

pub const NS_PER_MS: f64 = 1_000_000.0;
