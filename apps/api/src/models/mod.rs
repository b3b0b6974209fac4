pub mod occupation;
pub mod profile;
