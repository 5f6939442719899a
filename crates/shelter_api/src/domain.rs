mod animal_service;
mod export_service;
mod identity_service;
mod lookup_service;
mod medical_record_service;
mod photo_service;
mod vaccination_service;
mod views;

pub use animal_service::*;
pub use export_service::*;
pub use identity_service::*;
pub use lookup_service::*;
pub use medical_record_service::*;
pub use photo_service::*;
pub use vaccination_service::*;
pub use views::*;
