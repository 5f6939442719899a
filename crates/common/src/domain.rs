mod animal;
mod choices;
mod medical_record;
mod photo;
mod result;
mod vaccination;

pub use animal::*;
pub use choices::*;
pub use medical_record::*;
pub use photo::*;
pub use result::*;
pub use vaccination::*;
