pub mod error;
pub mod types;

pub use error::{BlinkError, BlinkResult};
pub use types::ServiceInfo;
