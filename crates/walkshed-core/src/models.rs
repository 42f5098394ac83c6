pub mod coordinate;
pub mod poi;
pub mod response;

pub use coordinate::{Coordinate, Polygon, QuantizedCoordinate};
pub use poi::{CategorizedResult, Category, Poi};
pub use response::{DurableEntry, LookupRequest, LookupResponse};
