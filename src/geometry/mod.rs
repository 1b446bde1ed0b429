mod coordinate;
pub use self::coordinate::*;

mod envelope;
pub use self::envelope::*;
