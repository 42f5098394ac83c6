mod health;
mod pois;

pub use health::health_check;
pub use pois::{lookup_pois, ClientIdentity, CLIENT_ID_HEADER};
