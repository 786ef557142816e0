pub mod map;
pub mod pages;
