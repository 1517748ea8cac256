pub mod bin;
pub mod fs;
pub mod installer;
