mod record;

pub use record::{Field, UploadRecord};
