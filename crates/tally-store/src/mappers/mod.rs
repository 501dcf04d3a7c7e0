//! Entity <-> model mappers

mod award;

pub use award::places_to_json;
