mod animal_handler;
mod dto;
mod export_handler;
mod extract;
mod lookup_handler;
mod medical_record_handler;
mod photo_handler;
mod server;
mod vaccination_handler;

pub use dto::*;
pub use extract::*;
pub use server::*;
