// Engine modules: fixed-tick loop, input intents, physics

pub mod game_loop;
pub mod input;
pub mod physics;
