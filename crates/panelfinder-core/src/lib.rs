//! Address resolution and derived-field recalculation for solar panel records.

pub mod address;
pub mod config;
pub mod dataset;
pub mod error;
pub mod overlay;
pub mod ranker;
pub mod record;
pub mod session;
pub mod similarity;
pub mod street_number;

pub use address::{AddressKey, normalize};
pub use config::MatchConfig;
pub use dataset::Dataset;
pub use error::CoreError;
pub use overlay::{Overlay, recompute};
pub use ranker::{Match, MatchRule, rank};
pub use record::{Field, FieldValue, SolarRecord};
pub use session::{Selection, Session};
pub use similarity::similar;
pub use street_number::StreetNumber;
