// Typed record types, one module per source CSV schema. Each module owns its
// exact header strings (load-bearing, including punctuation) and validates
// rows once at parse time so downstream code never does string-keyed lookups.

pub mod ghi;
pub mod indicators;
pub mod poverty;
pub mod prices;
