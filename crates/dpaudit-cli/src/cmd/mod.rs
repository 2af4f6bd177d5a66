pub mod analyze;
pub mod kinds;
