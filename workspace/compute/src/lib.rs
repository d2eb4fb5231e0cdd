//! Computations behind the poverty dashboard: the in-memory table, the
//! linear forecast and pie slice grouping.

pub mod error;
pub mod forecast;
pub mod pie;
pub mod table;

pub use forecast::{fit_linear, forecast};
pub use pie::{group_small_slices, plain_slices};
pub use table::PovertyTable;
