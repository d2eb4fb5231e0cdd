//! SeaORM entities for the poverty statistics table.
//!
//! The table is wide: one row per region, one nullable column per year. The
//! entity exposes helpers to convert a row into the long [`common::RegionSeries`]
//! form used by the rest of the application.

pub mod poverty_count;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::poverty_count::Entity as PovertyCount;
}
