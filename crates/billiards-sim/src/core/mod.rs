pub mod physics;
pub mod table;
