use crate::config::Rules;
use crate::data::combat::DuelResult;
use crate::data::error::GameError;
use crate::data::game_match::{Match, MatchView};
use crate::data::potions::PotionColor;
use crate::data::spells::SpellResult;
use crate::error::UltmaError;
use crate::storage::MatchStore;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

type SharedMatch = Arc<RwLock<Match>>;

pub fn parse_id(raw: &str) -> Result<Uuid, GameError> {
    Uuid::parse_str(raw.trim()).map_err(|_| GameError::not_found(format!("no player with id '{}'", raw.trim())))
}

/// Owns every match by id and the pointer to the one clients address.
/// Mutations run on a working copy that replaces the stored match only when
/// the operation succeeds.
pub struct MatchRegistry {
    rules: Rules,
    matches: RwLock<HashMap<Uuid, SharedMatch>>,
    active: RwLock<Option<Uuid>>,
    store: Option<MatchStore>,
}

impl MatchRegistry {
    pub fn new(rules: Rules, store: Option<MatchStore>) -> Self {
        Self {
            rules,
            matches: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
            store,
        }
    }

    pub fn restore(&self) -> Result<Option<Uuid>, UltmaError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let Some(game) = store.load()? else {
            return Ok(None);
        };
        let id = game.id;
        info!(match_id = %id, players = game.players.len(), path = %store.path().display(), "match restored");
        self.install(game);
        Ok(Some(id))
    }

    fn install(&self, game: Match) -> SharedMatch {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        self.install_locked(&mut active, &mut matches, game)
    }

    fn install_locked(&self, active: &mut Option<Uuid>, matches: &mut HashMap<Uuid, SharedMatch>, game: Match) -> SharedMatch {
        if let Some(previous) = active.take() {
            matches.remove(&previous);
        }
        self.save(&game);
        let id = game.id;
        let shared = Arc::new(RwLock::new(game));
        matches.insert(id, shared.clone());
        *active = Some(id);
        shared
    }

    fn active_match(&self) -> Option<SharedMatch> {
        let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
        let matches = self.matches.read().unwrap_or_else(PoisonError::into_inner);
        (*active).and_then(|id| matches.get(&id).cloned())
    }

    /// Checks for and creates the active match under one write lock.
    fn active_or_create(&self) -> SharedMatch {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(shared) = (*active).and_then(|id| matches.get(&id).cloned()) {
            return shared;
        }
        let game = Match::new(self.rules.clone());
        info!(match_id = %game.id, "match created");
        self.install_locked(&mut active, &mut matches, game)
    }

    fn current(&self) -> Result<SharedMatch, GameError> {
        self.active_match().ok_or_else(|| GameError::not_found("no active match; create one first"))
    }

    fn save(&self, game: &Match) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save(game) {
            warn!(match_id = %game.id, error = %err, "could not persist match");
        }
    }

    fn mutate_match<T>(
        &self,
        shared: &SharedMatch,
        op: &str,
        action: impl FnOnce(&mut Match) -> Result<T, GameError>,
    ) -> Result<(T, MatchView), GameError> {
        let mut game = shared.write().unwrap_or_else(PoisonError::into_inner);
        let mut working = game.clone();
        let value = match action(&mut working) {
            Ok(value) => value,
            Err(err) => {
                debug!(op, match_id = %game.id, kind = err.kind(), error = %err, "rejected");
                return Err(err);
            }
        };
        // Held through commit and save; a replaced match is never written back.
        let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
        if *active != Some(game.id) {
            debug!(op, match_id = %game.id, "match replaced before commit");
            return Err(GameError::not_found("the match was replaced; fetch the active match again"));
        }
        *game = working;
        debug!(op, match_id = %game.id, "committed");
        self.save(&game);
        Ok((value, game.view()))
    }

    fn mutate<T>(&self, op: &str, action: impl FnOnce(&mut Match) -> Result<T, GameError>) -> Result<(T, MatchView), GameError> {
        self.mutate_match(&self.current()?, op, action)
    }

    pub fn new_match(&self) -> MatchView {
        let game = Match::new(self.rules.clone());
        info!(match_id = %game.id, "match created");
        let view = game.view();
        self.install(game);
        view
    }

    pub fn join(&self, name: &str) -> Result<MatchView, GameError> {
        let shared = self.active_or_create();
        self.mutate_match(&shared, "join", |game| game.join(name)).map(|(_, view)| view)
    }

    pub fn cast(&self, player_id: Uuid, word1: &str, word2: &str) -> Result<SpellResult, GameError> {
        self.mutate("cast", |game| game.cast(player_id, word1, word2)).map(|(result, _)| result)
    }

    pub fn brew(&self, player_id: Uuid, word1: &str, word2: &str) -> Result<SpellResult, GameError> {
        self.mutate("create-potion", |game| game.brew(player_id, word1, word2)).map(|(result, _)| result)
    }

    pub fn meditate(&self, player_id: Uuid) -> Result<MatchView, GameError> {
        self.mutate("meditate", |game| game.meditate(player_id)).map(|(_, view)| view)
    }

    pub fn attack(&self, attacker_id: Uuid, target_id: Uuid, spell_name: &str) -> Result<DuelResult, GameError> {
        self.mutate("attack", |game| game.attack(attacker_id, target_id, spell_name)).map(|(duel, _)| duel)
    }

    pub fn activate_defense(&self, player_id: Uuid, spell_name: &str) -> Result<SpellResult, GameError> {
        self.mutate("activate-defense", |game| game.activate_defense(player_id, spell_name))
            .map(|(result, _)| result)
    }

    pub fn use_potion(&self, player_id: Uuid, color: PotionColor) -> Result<MatchView, GameError> {
        self.mutate("use-potion", |game| game.use_potion(player_id, color)).map(|(_, view)| view)
    }

    pub fn give_potion(&self, player_id: Uuid, color: PotionColor) -> Result<MatchView, GameError> {
        self.mutate("give-potion", |game| game.give_potion(player_id, color)).map(|(_, view)| view)
    }

    pub fn start_arena(&self) -> Result<MatchView, GameError> {
        self.mutate("start-arena", Match::start_arena).map(|(_, view)| view)
    }

    pub fn end_turn(&self, player_id: Uuid) -> Result<MatchView, GameError> {
        self.mutate("end-turn", |game| game.end_turn(player_id)).map(|(_, view)| view)
    }

    pub fn end_arena(&self) -> Result<MatchView, GameError> {
        self.mutate("end-arena", Match::end_arena).map(|(_, view)| view)
    }

    pub fn snapshot(&self) -> Result<MatchView, GameError> {
        let shared = self.current()?;
        let game = shared.read().unwrap_or_else(PoisonError::into_inner);
        Ok(game.view())
    }

    pub fn reset(&self) {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = active.take() {
            matches.remove(&id);
            info!(match_id = %id, "match reset");
        }
        if let Some(store) = &self.store {
            if let Err(err) = store.clear() {
                warn!(error = %err, "could not remove persisted match");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::sync::Barrier;
    use std::thread;

    fn rules() -> Rules {
        Rules {
            shuffle_words: false,
            reward_potion_on_discovery: false,
            ..Rules::default()
        }
    }

    fn registry() -> MatchRegistry {
        MatchRegistry::new(rules(), None)
    }

    fn player_ids(view: &MatchView) -> Vec<Uuid> {
        view.players.iter().map(|player| player.id).collect()
    }

    #[test]
    fn no_match_means_not_found() {
        let registry = registry();
        assert!(matches!(registry.snapshot(), Err(GameError::NotFound(_))));
        assert!(matches!(registry.start_arena(), Err(GameError::NotFound(_))));
    }

    #[test]
    fn joining_without_a_match_creates_one() {
        let registry = registry();
        let view = registry.join("Alice").expect("join");
        assert_eq!(view.players.len(), 1);
        assert_eq!(registry.snapshot().expect("snapshot").match_id, view.match_id);
    }

    #[test]
    fn new_match_replaces_the_old_one() {
        let registry = registry();
        let first = registry.join("Alice").expect("join");
        let second = registry.new_match();
        assert_ne!(first.match_id, second.match_id);
        assert!(second.players.is_empty());
    }

    #[test]
    fn rejected_requests_leave_the_snapshot_untouched() {
        let registry = registry();
        registry.new_match();
        for name in ["Alice", "Bob", "Carol", "Dave"] {
            registry.join(name).expect("join");
        }
        let before = registry.snapshot().expect("snapshot");
        let ids = player_ids(&before);
        assert!(registry.join("Eve").is_err());
        assert!(registry.attack(ids[0], ids[1], "Fireball").is_err());
        assert!(registry.activate_defense(ids[0], "Water Wall").is_err());
        assert!(registry.use_potion(ids[0], PotionColor::Pink).is_err());
        assert!(registry.end_turn(ids[0]).is_err());
        assert_eq!(registry.snapshot().expect("snapshot"), before);
    }

    #[test]
    fn results_come_with_the_committed_state() {
        let registry = registry();
        let view = registry.join("Alice").expect("join");
        let id = view.players[0].id;
        let result = registry.cast(id, "YNGVY", "VORLAG").expect("cast");
        assert!(result.success);
        let view = registry.meditate(id).expect("meditate");
        assert_eq!(view.players[0].mana, 5);
        assert_eq!(view.players[0].known_spells, vec!["Fireball".to_string()]);
    }

    #[test]
    fn reset_discards_the_match() {
        let registry = registry();
        registry.join("Alice").expect("join");
        registry.reset();
        assert!(matches!(registry.snapshot(), Err(GameError::NotFound(_))));
        registry.reset();
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert!(matches!(parse_id("not-a-uuid"), Err(GameError::NotFound(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&format!(" {} ", id)).ok(), Some(id));
    }

    #[test]
    fn concurrent_meditation_never_overflows_mana() {
        let registry = Arc::new(registry());
        let view = registry.join("Alice").expect("join");
        let id = view.players[0].id;
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        registry.meditate(id).expect("meditate");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }
        assert_eq!(registry.snapshot().expect("snapshot").players[0].mana, 5);
    }

    #[test]
    fn simultaneous_first_joins_share_one_match() {
        for _ in 0..200 {
            let registry = Arc::new(registry());
            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = ["Alice", "Bob"]
                .into_iter()
                .map(|name| {
                    let registry = registry.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        registry.join(name).expect("join").match_id
                    })
                })
                .collect();
            let ids: Vec<Uuid> = handles.into_iter().map(|handle| handle.join().expect("thread")).collect();
            let view = registry.snapshot().expect("snapshot");
            assert_eq!(ids, vec![view.match_id; 2]);
            assert_eq!(view.players.len(), 2);
        }
    }

    #[test]
    fn commits_to_a_replaced_match_are_refused() {
        let registry = registry();
        registry.join("Alice").expect("join");
        let stale = registry.current().expect("active");
        let replacement = registry.new_match();
        let refused = registry.mutate_match(&stale, "join", |game| game.join("Bob"));
        assert!(matches!(refused, Err(GameError::NotFound(_))));
        assert_eq!(stale.read().expect("lock").players.len(), 1);
        assert_eq!(registry.snapshot().expect("snapshot"), replacement);
    }

    #[test]
    fn persisted_match_survives_a_restart() {
        let path = temp_dir().join(format!("ultma-{}", Uuid::new_v4())).join("match.bin");
        let first = MatchRegistry::new(rules(), Some(MatchStore::new(&path)));
        let view = first.join("Alice").expect("join");
        let second = MatchRegistry::new(rules(), Some(MatchStore::new(&path)));
        assert_eq!(second.restore().expect("restore"), Some(view.match_id));
        assert_eq!(second.snapshot().expect("snapshot"), view);
        second.reset();
        let third = MatchRegistry::new(rules(), Some(MatchStore::new(&path)));
        assert_eq!(third.restore().expect("restore"), None);
    }
}
