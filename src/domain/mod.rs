pub mod fruit;
pub mod grid;
pub mod snake;
