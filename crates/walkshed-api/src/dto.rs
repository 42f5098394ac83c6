mod request;
mod response;

pub use request::PoiQuery;
pub use response::HealthResponse;
