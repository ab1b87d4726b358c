pub mod manifest;
pub mod token;
pub mod upload_translate;
