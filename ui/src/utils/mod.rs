pub mod colors;
pub mod location;
