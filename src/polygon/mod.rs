//! Holed polygons and the pairwise boolean union primitive.
//!
//! # Example
//!
//! ```
//! use figura::polygon::{unite, Contour, HoledPolygon};
//! use figura::Point2;
//!
//! let a = HoledPolygon::new(Contour::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ]));
//! let b = HoledPolygon::new(Contour::new(vec![
//!     Point2::new(0.5, 0.0),
//!     Point2::new(1.5, 0.0),
//!     Point2::new(1.5, 1.0),
//!     Point2::new(0.5, 1.0),
//! ]));
//!
//! let merged = unite(&a, &b, 1e-9);
//! assert_eq!(merged.len(), 1);
//! ```

mod boolean;
mod contour;
mod holed;

pub use boolean::unite;
pub use contour::Contour;
pub use holed::HoledPolygon;
