//! Planning which sketches still need to be computed.
//!
//! Every manifest row is crossed with every requested parameter set.
//! Combinations already listed in a sourmash manifest are skipped, and the
//! rest are grouped by input file.

pub mod params;
pub mod planner;
