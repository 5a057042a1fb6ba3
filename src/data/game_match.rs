use super::arena::{live_count, ArenaScheduler, ArenaState};
use super::combat::{CombatResolver, DuelResult};
use super::error::GameError;
use super::ledger::Resource;
use super::player::{pair_mut, Player};
use super::potions::{PotionCatalog, PotionColor, PotionEffect, PotionTable};
use super::spells::{Grimoire, SpellResult};
use super::words::Lexicon;
use crate::config::Rules;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub players: Vec<Player>,
    pub arena: ArenaState,
    pub lexicon: Lexicon,
    pub potion_table: PotionTable,
    pub rules: Rules,
    #[serde(skip, default = "fresh_rng")]
    rng: StdRng,
}

/// What clients poll: the match as seen over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub match_id: Uuid,
    pub players: Vec<Player>,
    pub is_arena_phase: bool,
    pub current_turn_player_index: Option<usize>,
    pub arena_round: u32,
    pub winner_id: Option<Uuid>,
    pub word_dictionary: BTreeMap<String, String>,
}

impl Match {
    pub fn new(rules: Rules) -> Self {
        let mut rng = match rules.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => fresh_rng(),
        };
        let lexicon = if rules.shuffle_words {
            Lexicon::shuffled(&mut rng)
        } else {
            Lexicon::identity()
        };
        let potion_table = if rules.shuffle_potions {
            rules.potions.shuffled(&mut rng)
        } else {
            rules.potions.clone()
        };
        Self {
            id: Uuid::new_v4(),
            players: Vec::new(),
            arena: ArenaState::default(),
            lexicon,
            potion_table,
            rules,
            rng,
        }
    }

    fn scheduler(&self) -> ArenaScheduler {
        ArenaScheduler {
            action_budget: self.rules.action_budget,
        }
    }

    fn resolver(&self) -> CombatResolver<'static> {
        CombatResolver {
            grimoire: Grimoire::standard(),
            ledger: self.rules.ledger(),
        }
    }

    pub fn seat(&self, player_id: Uuid) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|player| player.id == player_id)
            .ok_or_else(|| GameError::not_found(format!("no player with id {}", player_id)))
    }

    pub fn player(&self, player_id: Uuid) -> Result<&Player, GameError> {
        Ok(&self.players[self.seat(player_id)?])
    }

    fn live_seat(&self, player_id: Uuid) -> Result<usize, GameError> {
        let seat = self.seat(player_id)?;
        if self.players[seat].is_eliminated {
            return Err(GameError::validation(format!("{} has been eliminated", self.players[seat].name)));
        }
        Ok(seat)
    }

    pub fn join(&mut self, name: &str) -> Result<Uuid, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::validation("player name must not be empty"));
        }
        if self.arena.in_arena() {
            return Err(GameError::illegal_state("cannot join while the arena is in progress"));
        }
        if self.players.len() >= self.rules.max_players {
            return Err(GameError::validation(format!(
                "the match is full ({} players)",
                self.rules.max_players
            )));
        }
        let mut player = Player::new(name, self.players.len(), &self.rules.starting_resources());
        let grimoire = Grimoire::standard();
        for spell in &self.rules.starting_spells {
            if let Some(spell) = grimoire.spell(spell) {
                player.learn(&spell.name);
            }
        }
        let id = player.id;
        info!(match_id = %self.id, player_id = %id, name, seat = player.arena_position, "player joined");
        self.players.push(player);
        Ok(id)
    }

    pub fn cast(&mut self, player_id: Uuid, word1: &str, word2: &str) -> Result<SpellResult, GameError> {
        let seat = self.seat(player_id)?;
        let scheduler = self.scheduler();
        scheduler.authorize(&self.arena, &self.players, seat)?;
        let ledger = self.rules.ledger();
        let outcome = Grimoire::standard().cast(&mut self.players[seat], &self.lexicon, &ledger, word1, word2);
        let mut result = outcome.result;
        if !result.success {
            return Ok(result);
        }
        if outcome.learned && self.rules.reward_potion_on_discovery {
            let color = PotionColor::random(&mut self.rng);
            self.players[seat].potions.push(color);
            result.description = format!("{} (discovery reward: {} potion)", result.description, color);
        }
        scheduler.spend_action(&self.arena, &mut self.players, seat);
        Ok(result)
    }

    pub fn brew(&mut self, player_id: Uuid, word1: &str, word2: &str) -> Result<SpellResult, GameError> {
        let seat = self.live_seat(player_id)?;
        let ledger = self.rules.ledger();
        let outcome = Grimoire::standard().brew(
            &mut self.players[seat],
            &self.lexicon,
            &ledger,
            self.rules.brew_cost,
            word1,
            word2,
        );
        Ok(outcome.result)
    }

    pub fn meditate(&mut self, player_id: Uuid) -> Result<(), GameError> {
        let seat = self.live_seat(player_id)?;
        let amount = self.rules.meditate_mana as i64;
        self.rules.ledger().restore(&mut self.players[seat], Resource::Mana, amount);
        Ok(())
    }

    pub fn attack(&mut self, attacker_id: Uuid, target_id: Uuid, spell_name: &str) -> Result<DuelResult, GameError> {
        let attacker_seat = self.seat(attacker_id)?;
        let target_seat = self
            .seat(target_id)
            .map_err(|_| GameError::validation(format!("no target with id {}", target_id)))?;
        let scheduler = self.scheduler();
        scheduler.authorize(&self.arena, &self.players, attacker_seat)?;
        let resolver = self.resolver();
        let (attacker, target) = pair_mut(&mut self.players, attacker_seat, target_seat)
            .ok_or_else(|| GameError::validation("a wizard cannot attack themselves"))?;
        let duel = resolver.attack(attacker, target, spell_name)?;
        if target.is_eliminated {
            info!(match_id = %self.id, player_id = %target.id, by = %attacker.id, "player eliminated");
        }
        scheduler.spend_action(&self.arena, &mut self.players, attacker_seat);
        scheduler.ensure_live_turn(&mut self.arena, &mut self.players);
        Ok(duel)
    }

    pub fn activate_defense(&mut self, player_id: Uuid, spell_name: &str) -> Result<SpellResult, GameError> {
        let seat = self.seat(player_id)?;
        let scheduler = self.scheduler();
        scheduler.authorize(&self.arena, &self.players, seat)?;
        let result = self.resolver().activate_defense(&mut self.players[seat], spell_name)?;
        scheduler.spend_action(&self.arena, &mut self.players, seat);
        Ok(result)
    }

    pub fn use_potion(&mut self, player_id: Uuid, color: PotionColor) -> Result<PotionEffect, GameError> {
        let seat = self.seat(player_id)?;
        let scheduler = self.scheduler();
        scheduler.authorize(&self.arena, &self.players, seat)?;
        let catalog = PotionCatalog {
            table: &self.potion_table,
            ledger: self.rules.ledger(),
        };
        let effect = catalog.consume(&mut self.players[seat], color)?;
        if self.players[seat].is_eliminated {
            info!(match_id = %self.id, player_id = %player_id, potion = %color, "player eliminated");
        }
        scheduler.spend_action(&self.arena, &mut self.players, seat);
        scheduler.ensure_live_turn(&mut self.arena, &mut self.players);
        Ok(effect)
    }

    pub fn give_potion(&mut self, player_id: Uuid, color: PotionColor) -> Result<(), GameError> {
        let seat = self.seat(player_id)?;
        let catalog = PotionCatalog {
            table: &self.potion_table,
            ledger: self.rules.ledger(),
        };
        catalog.give(&mut self.players[seat], color);
        Ok(())
    }

    pub fn start_arena(&mut self) -> Result<(), GameError> {
        self.scheduler().start(&mut self.arena, &mut self.players)?;
        info!(match_id = %self.id, players = live_count(&self.players), "arena started");
        Ok(())
    }

    pub fn end_turn(&mut self, player_id: Uuid) -> Result<(), GameError> {
        let seat = self.seat(player_id)?;
        self.scheduler().end_turn(&mut self.arena, &mut self.players, seat)
    }

    pub fn end_arena(&mut self) -> Result<(), GameError> {
        let ledger = self.rules.ledger();
        let bonus = self.rules.arena_mana_bonus;
        self.scheduler().end(&mut self.arena, &mut self.players, &ledger, bonus)?;
        if self.rules.refresh_words_after_arena {
            self.lexicon = Lexicon::shuffled(&mut self.rng);
        }
        info!(match_id = %self.id, "arena ended");
        Ok(())
    }

    pub fn winner(&self) -> Option<Uuid> {
        if self.players.len() < 2 {
            return None;
        }
        let mut live = self.players.iter().filter(|player| !player.is_eliminated);
        match (live.next(), live.next()) {
            (Some(player), None) => Some(player.id),
            _ => None,
        }
    }

    pub fn view(&self) -> MatchView {
        MatchView {
            match_id: self.id,
            players: self.players.clone(),
            is_arena_phase: self.arena.in_arena(),
            current_turn_player_index: self.arena.current_turn(),
            arena_round: self.arena.round,
            winner_id: self.winner(),
            word_dictionary: self.lexicon.dictionary(),
        }
    }
}
