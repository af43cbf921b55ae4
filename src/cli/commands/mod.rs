pub mod check;
pub mod sets;
pub mod token;
