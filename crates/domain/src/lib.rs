mod id;
mod models;

pub use id::{BinaryId, IdError};
pub use models::{Comment, DeletedComment};
