pub mod domain;
pub mod http;
pub mod shelter_api;

pub use domain::*;
pub use crate::http::*;
pub use shelter_api::*;
