pub mod azan;
pub mod player;

pub use azan::{AzanToggle, PlayerFactory};
pub use player::{Playback, ProcessPlayer};
