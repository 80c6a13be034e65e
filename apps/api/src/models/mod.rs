pub mod document;
pub mod record;
