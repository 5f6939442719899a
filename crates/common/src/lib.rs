pub mod domain;
pub mod garde;
pub mod http;
pub mod identity;
pub mod media;
pub mod postgres;
pub mod telemetry;

#[cfg(any(test, feature = "testing"))]
pub mod test_support;
