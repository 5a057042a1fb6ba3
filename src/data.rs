pub mod arena;
pub mod combat;
pub mod error;
pub mod game_match;
pub mod ledger;
pub mod player;
pub mod potions;
mod spellbook;
pub mod spells;
pub mod words;
