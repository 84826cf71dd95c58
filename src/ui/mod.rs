pub mod cutscene;
pub mod input;
pub mod renderer;
pub mod sound;
