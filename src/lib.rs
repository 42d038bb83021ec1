// # afd-discover
//
// Approximate functional dependency discovery over in-memory tables: given a
// column table, find minimal attribute sets X such that X -> a holds within
// an error bound, for every RHS column a. See `afd::discover` for the entry
// point and `afd::DiscoveryConfig` for the knobs.

pub mod afd;
pub mod error;

pub use afd::{discover, AttrSet, DiscoveryConfig, Fd, MeasureKind, Pli, PliCache, SamplingKind, Table};
pub use error::{DiscoveryError, Result};
