mod dimension_map;
pub use self::dimension_map::*;

mod shape;
pub use self::shape::*;
