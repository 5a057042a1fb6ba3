use super::error::GameError;
use super::ledger::{Resource, ResourceLedger};
use super::player::Player;
use super::words::normalize;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PotionColor {
    Pink,
    Green,
    Blue,
    Red,
    White,
    Purple,
}

impl PotionColor {
    pub const ALL: [PotionColor; 6] = [
        PotionColor::Pink,
        PotionColor::Green,
        PotionColor::Blue,
        PotionColor::Red,
        PotionColor::White,
        PotionColor::Purple,
    ];

    pub fn parse(color: &str) -> Result<Self, GameError> {
        use PotionColor::*;
        match normalize(color).as_str() {
            "PINK" => Ok(Pink),
            "GREEN" => Ok(Green),
            "BLUE" => Ok(Blue),
            "RED" => Ok(Red),
            "WHITE" => Ok(White),
            "PURPLE" => Ok(Purple),
            _ => Err(GameError::validation(format!("unknown potion color '{}'", color.trim()))),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&PotionColor::Pink)
    }

    pub fn as_str(&self) -> &'static str {
        use PotionColor::*;
        match self {
            Pink => "PINK",
            Green => "GREEN",
            Blue => "BLUE",
            Red => "RED",
            White => "WHITE",
            Purple => "PURPLE",
        }
    }
}

impl fmt::Display for PotionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotionEffect {
    RestoreLife(u32),
    RestoreShield(u32),
    RestoreMana(u32),
    DrainMana(u32),
    DrainShield(u32),
    Corrupt(u32),
    Cleanse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionRecipe {
    pub color: PotionColor,
    pub effect: PotionEffect,
}

/// Which effect each potion color carries in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PotionTable {
    recipes: Vec<PotionRecipe>,
}

impl PotionTable {
    pub fn new(recipes: Vec<PotionRecipe>) -> Self {
        let mut table = Self { recipes: Vec::new() };
        for recipe in recipes {
            table.set(recipe.color, recipe.effect);
        }
        table
    }

    pub fn effect(&self, color: PotionColor) -> Option<PotionEffect> {
        self.recipes.iter().find(|recipe| recipe.color == color).map(|recipe| recipe.effect)
    }

    pub fn set(&mut self, color: PotionColor, effect: PotionEffect) {
        match self.recipes.iter_mut().find(|recipe| recipe.color == color) {
            Some(recipe) => recipe.effect = effect,
            None => self.recipes.push(PotionRecipe { color, effect }),
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut effects: Vec<PotionEffect> = self.recipes.iter().map(|recipe| recipe.effect).collect();
        effects.shuffle(rng);
        let recipes = self
            .recipes
            .iter()
            .zip(effects)
            .map(|(recipe, effect)| PotionRecipe {
                color: recipe.color,
                effect,
            })
            .collect();
        Self { recipes }
    }

    pub fn recipes(&self) -> &[PotionRecipe] {
        &self.recipes
    }
}

impl Default for PotionTable {
    fn default() -> Self {
        use PotionColor::*;
        use PotionEffect::*;
        Self::new(vec![
            PotionRecipe {
                color: Pink,
                effect: RestoreLife(1),
            },
            PotionRecipe {
                color: Green,
                effect: Cleanse,
            },
            PotionRecipe {
                color: Blue,
                effect: RestoreMana(3),
            },
            PotionRecipe {
                color: Red,
                effect: Corrupt(1),
            },
            PotionRecipe {
                color: White,
                effect: RestoreShield(3),
            },
            PotionRecipe {
                color: Purple,
                effect: DrainMana(3),
            },
        ])
    }
}

pub struct PotionCatalog<'a> {
    pub table: &'a PotionTable,
    pub ledger: ResourceLedger,
}

impl PotionCatalog<'_> {
    pub fn give(&self, player: &mut Player, color: PotionColor) {
        player.potions.push(color);
    }

    pub fn check_usable(&self, player: &Player, color: PotionColor) -> Result<PotionEffect, GameError> {
        if player.potion_count(color) == 0 {
            return Err(GameError::validation(format!(
                "{} does not hold a {} potion",
                player.name, color
            )));
        }
        self.table
            .effect(color)
            .ok_or_else(|| GameError::validation(format!("{} potions have no effect in this match", color)))
    }

    pub fn consume(&self, player: &mut Player, color: PotionColor) -> Result<PotionEffect, GameError> {
        let effect = self.check_usable(player, color)?;
        if let Some(index) = player.potions.iter().position(|held| *held == color) {
            player.potions.remove(index);
        }
        self.apply(player, effect);
        Ok(effect)
    }

    fn apply(&self, player: &mut Player, effect: PotionEffect) {
        use PotionEffect::*;
        match effect {
            RestoreLife(amount) => self.ledger.restore(player, Resource::Life, amount as i64),
            RestoreShield(amount) => self.ledger.restore(player, Resource::Shield, amount as i64),
            RestoreMana(amount) => self.ledger.restore(player, Resource::Mana, amount as i64),
            DrainMana(amount) => self.ledger.restore(player, Resource::Mana, -(amount as i64)),
            DrainShield(amount) => self.ledger.restore(player, Resource::Shield, -(amount as i64)),
            Corrupt(amount) => self.ledger.restore(player, Resource::Life, -(amount as i64)),
            Cleanse => player.active_defenses.clear(),
        }
    }
}
