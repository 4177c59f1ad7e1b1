pub mod check;
pub mod draw;
pub mod prompt;
pub mod records;
