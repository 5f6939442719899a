mod animal_repository;
mod client;
mod config;
mod medical_record_repository;
mod migrations;
mod photo_repository;
mod vaccination_repository;

pub use animal_repository::*;
pub use client::*;
pub use config::*;
pub use medical_record_repository::*;
pub use migrations::*;
pub use photo_repository::*;
pub use vaccination_repository::*;
