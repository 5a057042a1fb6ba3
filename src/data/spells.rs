use super::ledger::ResourceLedger;
use super::player::Player;
use super::potions::PotionColor;
use super::spellbook::{BREWS, SPELLS};
use super::words::{Lexicon, MeaningPair};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    static ref GRIMOIRE: Grimoire = Grimoire::new(&SPELLS, &BREWS);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellCategory {
    Attack,
    Defense,
    Utility,
}

impl SpellCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpellCategory::Attack => "Attack",
            SpellCategory::Defense => "Defense",
            SpellCategory::Utility => "Utility",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackStats {
    pub damage: u32,
    pub mana_drain: u32,
    pub blocked_by: Vec<String>,
    pub amplified_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefenseStats {
    pub shield_bonus: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpellKind {
    Attack(AttackStats),
    Defense(DefenseStats),
    Utility,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spell {
    pub name: String,
    pub cost: u32,
    pub description: String,
    pub kind: SpellKind,
    pub combination: Option<MeaningPair>,
}

impl Spell {
    pub fn category(&self) -> SpellCategory {
        match self.kind {
            SpellKind::Attack(_) => SpellCategory::Attack,
            SpellKind::Defense(_) => SpellCategory::Defense,
            SpellKind::Utility => SpellCategory::Utility,
        }
    }

    pub fn is_blocked_by(&self, defense: &str) -> bool {
        match self.kind {
            SpellKind::Attack(ref stats) => stats.blocked_by.iter().any(|name| name == defense),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellResult {
    pub spell_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mana_cost: u32,
    pub description: String,
    pub success: bool,
}

impl SpellResult {
    pub fn failed(description: &str) -> Self {
        Self {
            spell_name: "Magic Failure".to_string(),
            kind: "None".to_string(),
            mana_cost: 0,
            description: description.to_string(),
            success: false,
        }
    }

    pub fn fizzled(spell: &Spell) -> Self {
        Self {
            spell_name: spell.name.clone(),
            kind: spell.category().as_str().to_string(),
            mana_cost: spell.cost,
            description: "Not enough mana to cast this spell".to_string(),
            success: false,
        }
    }

    pub fn succeeded(spell: &Spell) -> Self {
        Self {
            spell_name: spell.name.clone(),
            kind: spell.category().as_str().to_string(),
            mana_cost: spell.cost,
            description: spell.description.clone(),
            success: true,
        }
    }
}

pub struct CastOutcome {
    pub result: SpellResult,
    pub learned: bool,
}

pub struct BrewOutcome {
    pub result: SpellResult,
    pub potion: Option<PotionColor>,
}

/// Word-pair to spell lookup. Keys are canonical meaning pairs so each
/// combination is stored once regardless of word order.
pub struct Grimoire {
    spells: &'static [Spell],
    by_pair: HashMap<MeaningPair, usize>,
    by_name: HashMap<String, usize>,
    brews: HashMap<MeaningPair, PotionColor>,
}

impl Grimoire {
    pub fn new(spells: &'static [Spell], brews: &[(MeaningPair, PotionColor)]) -> Self {
        let mut by_pair = HashMap::new();
        let mut by_name = HashMap::new();
        for (index, spell) in spells.iter().enumerate() {
            by_name.insert(spell.name.clone(), index);
            if let Some(pair) = spell.combination {
                by_pair.insert(pair, index);
            }
        }
        Self {
            spells,
            by_pair,
            by_name,
            brews: brews.iter().copied().collect(),
        }
    }

    pub fn standard() -> &'static Grimoire {
        &GRIMOIRE
    }

    fn pair(&self, lexicon: &Lexicon, word1: &str, word2: &str) -> Option<MeaningPair> {
        let pair = MeaningPair::new(lexicon.translate(word1)?, lexicon.translate(word2)?);
        if pair.is_doubled() {
            None
        } else {
            Some(pair)
        }
    }

    pub fn discover(&self, lexicon: &Lexicon, word1: &str, word2: &str) -> Option<&Spell> {
        let index = self.by_pair.get(&self.pair(lexicon, word1, word2)?)?;
        self.spells.get(*index)
    }

    pub fn spell(&self, name: &str) -> Option<&Spell> {
        self.by_name.get(name.trim()).and_then(|index| self.spells.get(*index))
    }

    #[cfg(test)]
    pub fn spells(&self) -> impl Iterator<Item = &Spell> {
        self.spells.iter()
    }

    pub fn check_cast(&self, player: &Player, lexicon: &Lexicon, word1: &str, word2: &str) -> Result<&Spell, SpellResult> {
        let spell = self
            .discover(lexicon, word1, word2)
            .ok_or_else(|| SpellResult::failed("The combination failed."))?;
        if player.mana < spell.cost {
            return Err(SpellResult::fizzled(spell));
        }
        Ok(spell)
    }

    pub fn cast(&self, player: &mut Player, lexicon: &Lexicon, ledger: &ResourceLedger, word1: &str, word2: &str) -> CastOutcome {
        match self.check_cast(player, lexicon, word1, word2) {
            Err(result) => CastOutcome { result, learned: false },
            Ok(spell) => {
                ledger.adjust_mana(player, -(spell.cost as i64));
                let learned = player.learn(&spell.name);
                CastOutcome {
                    result: SpellResult::succeeded(spell),
                    learned,
                }
            }
        }
    }

    pub fn brew(
        &self,
        player: &mut Player,
        lexicon: &Lexicon,
        ledger: &ResourceLedger,
        cost: u32,
        word1: &str,
        word2: &str,
    ) -> BrewOutcome {
        let color = match self.pair(lexicon, word1, word2).and_then(|pair| self.brews.get(&pair)) {
            Some(color) => *color,
            None => {
                return BrewOutcome {
                    result: SpellResult::failed("This combination does not brew a potion"),
                    potion: None,
                }
            }
        };
        let mut result = SpellResult {
            spell_name: "Potion Brewed".to_string(),
            kind: "Potion".to_string(),
            mana_cost: cost,
            description: format!("{} potion brewed", color),
            success: true,
        };
        if player.mana < cost {
            result.description = "Not enough mana to brew a potion".to_string();
            result.success = false;
            return BrewOutcome { result, potion: None };
        }
        ledger.adjust_mana(player, -(cost as i64));
        player.potions.push(color);
        BrewOutcome {
            result,
            potion: Some(color),
        }
    }
}
