pub mod markup;
pub mod theme;
