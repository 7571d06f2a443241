pub mod api;
pub mod assets;
pub mod feedback;
pub mod festival;
pub mod index;
pub mod search;
