pub use method::Method;
pub use status_code::StatusCode;

pub mod limits;
mod method;
mod status_code;
