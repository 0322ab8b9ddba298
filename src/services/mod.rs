// Service exports
pub mod directory;

pub use directory::{TutorDirectory, DirectorySource, DirectoryError, parse_entities};
