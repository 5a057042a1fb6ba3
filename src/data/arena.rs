use super::error::GameError;
use super::ledger::ResourceLedger;
use super::player::Player;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Lobby,
    Arena,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaState {
    pub phase: Phase,
    pub round: u32,
    pub current_seat: usize,
    round_start: usize,
}

impl ArenaState {
    pub fn in_arena(&self) -> bool {
        self.phase == Phase::Arena
    }

    pub fn current_turn(&self) -> Option<usize> {
        if self.in_arena() {
            Some(self.current_seat)
        } else {
            None
        }
    }
}

pub fn live_count(players: &[Player]) -> usize {
    players.iter().filter(|p| !p.is_eliminated).count()
}

/// Cyclic seat distance of exactly one.
pub fn are_adjacent(pos1: usize, pos2: usize, total_players: usize) -> bool {
    if total_players < 2 || pos1 >= total_players || pos2 >= total_players {
        return false;
    }
    let distance = pos1.abs_diff(pos2);
    distance.min(total_players - distance) == 1
}

pub struct ArenaScheduler {
    pub action_budget: u32,
}

impl ArenaScheduler {
    pub fn start(&self, arena: &mut ArenaState, players: &mut [Player]) -> Result<(), GameError> {
        if arena.in_arena() {
            return Err(GameError::illegal_state("the arena is already in progress"));
        }
        if live_count(players) < 2 {
            return Err(GameError::validation("the arena needs at least two wizards standing"));
        }
        let first = players.iter().position(|p| !p.is_eliminated).unwrap_or(0);
        for player in players.iter_mut() {
            player.actions_remaining = if player.is_eliminated { 0 } else { self.action_budget };
            player.active_defenses.clear();
        }
        arena.phase = Phase::Arena;
        arena.round = 1;
        arena.current_seat = first;
        arena.round_start = first;
        Ok(())
    }

    /// Gameplay actions are free in the lobby; in the arena only the current
    /// seat may act and only while it has actions left.
    pub fn authorize(&self, arena: &ArenaState, players: &[Player], seat: usize) -> Result<(), GameError> {
        let player = players
            .get(seat)
            .ok_or_else(|| GameError::not_found(format!("no player at seat {}", seat)))?;
        if player.is_eliminated {
            return Err(GameError::validation(format!("{} has been eliminated", player.name)));
        }
        if !arena.in_arena() {
            return Ok(());
        }
        if arena.current_seat != seat {
            return Err(GameError::validation("it is not your turn; wait for the current wizard to finish"));
        }
        if player.actions_remaining == 0 {
            return Err(GameError::validation("you have no actions remaining this turn"));
        }
        Ok(())
    }

    pub fn spend_action(&self, arena: &ArenaState, players: &mut [Player], seat: usize) {
        if !arena.in_arena() {
            return;
        }
        if let Some(player) = players.get_mut(seat) {
            player.actions_remaining = player.actions_remaining.saturating_sub(1);
        }
    }

    pub fn end_turn(&self, arena: &mut ArenaState, players: &mut [Player], seat: usize) -> Result<(), GameError> {
        if !arena.in_arena() {
            return Err(GameError::illegal_state("turns can only be ended during the arena"));
        }
        if arena.current_seat != seat {
            return Err(GameError::validation("it is not your turn"));
        }
        if players.get(seat).map_or(0, |p| p.actions_remaining) > 0 {
            return Err(GameError::validation("spend every action before ending the turn"));
        }
        self.advance(arena, players);
        Ok(())
    }

    /// Moves the turn off a seat whose wizard was eliminated mid-turn.
    pub fn ensure_live_turn(&self, arena: &mut ArenaState, players: &mut [Player]) {
        if !arena.in_arena() {
            return;
        }
        let stale = players.get(arena.current_seat).map_or(true, |p| p.is_eliminated);
        if stale {
            if let Some(player) = players.get_mut(arena.current_seat) {
                player.actions_remaining = 0;
            }
            self.advance(arena, players);
        }
    }

    fn advance(&self, arena: &mut ArenaState, players: &mut [Player]) {
        let total = players.len();
        let mut wrapped = false;
        for step in 1..=total {
            let seat = (arena.current_seat + step) % total;
            if seat == arena.round_start {
                wrapped = true;
            }
            if players[seat].is_eliminated {
                continue;
            }
            if wrapped {
                arena.round += 1;
                arena.round_start = seat;
            }
            arena.current_seat = seat;
            players[seat].actions_remaining = self.action_budget;
            return;
        }
    }

    pub fn end(&self, arena: &mut ArenaState, players: &mut [Player], ledger: &ResourceLedger, mana_bonus: u32) -> Result<(), GameError> {
        if !arena.in_arena() {
            return Err(GameError::illegal_state("there is no arena to end"));
        }
        for player in players.iter_mut() {
            player.actions_remaining = 0;
            player.active_defenses.clear();
            if !player.is_eliminated {
                ledger.adjust_mana(player, mana_bonus as i64);
            }
        }
        *arena = ArenaState::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::player::StartingResources;
    use proptest::prelude::*;

    const SCHEDULER: ArenaScheduler = ArenaScheduler { action_budget: 3 };

    fn seats(count: usize) -> Vec<Player> {
        let start = StartingResources {
            life: 3,
            shield: 5,
            mana: 2,
        };
        (0..count).map(|seat| Player::new(&format!("Wizard {}", seat), seat, &start)).collect()
    }

    fn spend_all(arena: &ArenaState, players: &mut [Player]) {
        let seat = arena.current_seat;
        while players[seat].actions_remaining > 0 {
            SCHEDULER.authorize(arena, players, seat).expect("authorized");
            SCHEDULER.spend_action(arena, players, seat);
        }
    }

    #[test]
    fn adjacency_wraps_around_the_ring() {
        assert!(are_adjacent(0, 1, 4));
        assert!(are_adjacent(0, 3, 4));
        assert!(!are_adjacent(0, 2, 4));
        assert!(!are_adjacent(1, 1, 4));
        assert!(are_adjacent(0, 1, 2));
        assert!(!are_adjacent(0, 4, 4));
        assert!(!are_adjacent(0, 0, 1));
    }

    #[test]
    fn start_requires_two_live_wizards() {
        let mut arena = ArenaState::default();
        let mut players = seats(1);
        assert!(matches!(SCHEDULER.start(&mut arena, &mut players), Err(GameError::Validation(_))));
        assert_eq!(arena, ArenaState::default());
    }

    #[test]
    fn start_assigns_budget_and_lowest_live_seat() {
        let mut arena = ArenaState::default();
        let mut players = seats(3);
        players[0].is_eliminated = true;
        SCHEDULER.start(&mut arena, &mut players).expect("start");
        assert_eq!(arena.round, 1);
        assert_eq!(arena.current_turn(), Some(1));
        assert_eq!(players[0].actions_remaining, 0);
        assert_eq!(players[1].actions_remaining, 3);
        assert!(matches!(SCHEDULER.start(&mut arena, &mut players), Err(GameError::IllegalState(_))));
    }

    #[test]
    fn only_the_current_seat_may_act() {
        let mut arena = ArenaState::default();
        let mut players = seats(2);
        SCHEDULER.start(&mut arena, &mut players).expect("start");
        assert!(SCHEDULER.authorize(&arena, &players, 1).is_err());
        spend_all(&arena, &mut players);
        assert!(SCHEDULER.authorize(&arena, &players, 0).is_err());
    }

    #[test]
    fn ending_a_turn_with_actions_left_is_rejected() {
        let mut arena = ArenaState::default();
        let mut players = seats(2);
        SCHEDULER.start(&mut arena, &mut players).expect("start");
        let before = arena.clone();
        assert!(matches!(SCHEDULER.end_turn(&mut arena, &mut players, 0), Err(GameError::Validation(_))));
        assert_eq!(arena, before);
    }

    #[test]
    fn turns_rotate_and_rounds_count_wraps() {
        let mut arena = ArenaState::default();
        let mut players = seats(3);
        SCHEDULER.start(&mut arena, &mut players).expect("start");
        for expected in [1, 2, 0, 1] {
            spend_all(&arena, &mut players);
            let seat = arena.current_seat;
            SCHEDULER.end_turn(&mut arena, &mut players, seat).expect("end turn");
            assert_eq!(arena.current_seat, expected);
            assert_eq!(players[expected].actions_remaining, 3);
        }
        assert_eq!(arena.round, 2);
    }

    #[test]
    fn rotation_skips_eliminated_seats() {
        let mut arena = ArenaState::default();
        let mut players = seats(4);
        SCHEDULER.start(&mut arena, &mut players).expect("start");
        players[1].is_eliminated = true;
        players[2].is_eliminated = true;
        spend_all(&arena, &mut players);
        SCHEDULER.end_turn(&mut arena, &mut players, 0).expect("end turn");
        assert_eq!(arena.current_seat, 3);
        assert_eq!(arena.round, 1);
        spend_all(&arena, &mut players);
        SCHEDULER.end_turn(&mut arena, &mut players, 3).expect("end turn");
        assert_eq!(arena.current_seat, 0);
        assert_eq!(arena.round, 2);
    }

    #[test]
    fn eliminated_current_seat_hands_over_the_turn() {
        let mut arena = ArenaState::default();
        let mut players = seats(3);
        SCHEDULER.start(&mut arena, &mut players).expect("start");
        players[0].is_eliminated = true;
        SCHEDULER.ensure_live_turn(&mut arena, &mut players);
        assert_eq!(arena.current_seat, 1);
        assert_eq!(players[0].actions_remaining, 0);
        assert_eq!(players[1].actions_remaining, 3);
    }

    #[test]
    fn ending_the_arena_restores_mana_and_clears_turn_state() {
        let ledger = ResourceLedger {
            life_cap: 3,
            shield_cap: 10,
            mana_cap: 5,
        };
        let mut arena = ArenaState::default();
        let mut players = seats(2);
        SCHEDULER.start(&mut arena, &mut players).expect("start");
        players[1].active_defenses.push("Levitation".to_string());
        SCHEDULER.end(&mut arena, &mut players, &ledger, 2).expect("end");
        assert_eq!(arena.phase, Phase::Lobby);
        assert_eq!(arena.current_turn(), None);
        for player in &players {
            assert_eq!(player.actions_remaining, 0);
            assert_eq!(player.mana, 4);
            assert!(player.active_defenses.is_empty());
        }
        assert!(SCHEDULER.end(&mut arena, &mut players, &ledger, 2).is_err());
    }

    proptest! {
        #[test]
        fn adjacency_is_symmetric(total in 2usize..9, a in 0usize..9, b in 0usize..9) {
            prop_assert_eq!(are_adjacent(a, b, total), are_adjacent(b, a, total));
        }

        #[test]
        fn current_seat_stays_live(eliminations in proptest::collection::vec(0usize..4, 0..3), turns in 1usize..12) {
            let mut arena = ArenaState::default();
            let mut players = seats(4);
            SCHEDULER.start(&mut arena, &mut players).expect("start");
            for seat in eliminations {
                players[seat].is_eliminated = true;
            }
            prop_assume!(live_count(&players) >= 1);
            SCHEDULER.ensure_live_turn(&mut arena, &mut players);
            for _ in 0..turns {
                spend_all(&arena, &mut players);
                let seat = arena.current_seat;
                SCHEDULER.end_turn(&mut arena, &mut players, seat).expect("end turn");
                prop_assert!(!players[arena.current_seat].is_eliminated);
                prop_assert!(players[arena.current_seat].actions_remaining <= 3);
            }
        }
    }
}
