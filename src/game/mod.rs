pub mod board_generator;
mod pair_order;
pub mod rng;
pub mod session;
pub mod settings;

pub use board_generator::{
    generate, generate_or_default, GenerateRequest, GeneratedBoard, GenerationError, ShuffleMode,
};
pub use rng::Seed;
pub use session::{GameSession, GameStatus, MatchRecord};
pub use settings::EngineSettings;
