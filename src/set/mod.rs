//! Owning entity containers and the algorithms built on them.
//!
//! [`EntitySet`] is the storage and ownership-transfer foundation; the
//! specialized sets compose it rather than re-implement it:
//!
//! - [`LineSet`] - line chains plus the sweep intersection detector
//! - [`StrandSet`] - chain assembly over endpoint equality
//! - [`PolygonSet`] - the polygon unification engine

mod entity_set;
mod line_set;
mod polygon_set;
mod strand_set;

pub use entity_set::EntitySet;
pub use line_set::{Crossing, LineSet};
pub use polygon_set::{DegeneracyMode, PolygonSet};
pub use strand_set::StrandSet;
