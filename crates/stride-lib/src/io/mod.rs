pub mod points;
pub mod text;
