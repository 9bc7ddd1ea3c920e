// Engine modules: renderer, assets, input, timing

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod renderer;
