pub mod festival;
pub mod main;
