mod feature;
mod geometry;
mod properties;
mod value;

pub use feature::*;
pub use geometry::*;
pub use properties::*;
pub use value::*;
