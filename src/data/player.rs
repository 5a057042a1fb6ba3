use super::potions::PotionColor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub life_energy: u32,
    pub magic_shield: u32,
    pub mana: u32,
    pub is_eliminated: bool,
    pub known_spells: Vec<String>,
    pub potions: Vec<PotionColor>,
    pub active_defenses: Vec<String>,
    pub arena_position: usize,
    pub actions_remaining: u32,
}

pub struct StartingResources {
    pub life: u32,
    pub shield: u32,
    pub mana: u32,
}

impl Player {
    pub fn new(name: &str, seat: usize, start: &StartingResources) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            life_energy: start.life,
            magic_shield: start.shield,
            mana: start.mana,
            is_eliminated: false,
            known_spells: Vec::new(),
            potions: Vec::new(),
            active_defenses: Vec::new(),
            arena_position: seat,
            actions_remaining: 0,
        }
    }

    pub fn knows(&self, spell: &str) -> bool {
        self.known_spells.iter().any(|known| known == spell)
    }

    /// Returns true the first time a spell is learned.
    pub fn learn(&mut self, spell: &str) -> bool {
        if self.knows(spell) {
            return false;
        }
        self.known_spells.push(spell.to_string());
        true
    }

    pub fn has_defense(&self, spell: &str) -> bool {
        self.active_defenses.iter().any(|active| active == spell)
    }

    pub fn consume_defense(&mut self, spell: &str) -> bool {
        match self.active_defenses.iter().position(|active| active == spell) {
            Some(index) => {
                self.active_defenses.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn potion_count(&self, color: PotionColor) -> usize {
        self.potions.iter().filter(|held| **held == color).count()
    }
}

/// Borrows two distinct players from the seat list at once.
pub fn pair_mut(players: &mut [Player], a: usize, b: usize) -> Option<(&mut Player, &mut Player)> {
    if a == b || a >= players.len() || b >= players.len() {
        return None;
    }
    if a < b {
        let (left, right) = players.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = players.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> StartingResources {
        StartingResources {
            life: 3,
            shield: 5,
            mana: 5,
        }
    }

    #[test]
    fn learning_is_idempotent() {
        let mut player = Player::new("Alice", 0, &start());
        assert!(player.learn("Fireball"));
        assert!(!player.learn("Fireball"));
        assert_eq!(player.known_spells, vec!["Fireball".to_string()]);
    }

    #[test]
    fn pair_mut_returns_players_in_requested_order() {
        let mut players = vec![
            Player::new("Alice", 0, &start()),
            Player::new("Bob", 1, &start()),
            Player::new("Carol", 2, &start()),
        ];
        let (first, second) = pair_mut(&mut players, 2, 0).expect("pair");
        assert_eq!(first.name, "Carol");
        assert_eq!(second.name, "Alice");
        assert!(pair_mut(&mut players, 1, 1).is_none());
        assert!(pair_mut(&mut players, 0, 3).is_none());
    }

    #[test]
    fn consuming_a_defense_removes_a_single_entry() {
        let mut player = Player::new("Alice", 0, &start());
        player.active_defenses.push("Water Wall".to_string());
        assert!(player.consume_defense("Water Wall"));
        assert!(!player.consume_defense("Water Wall"));
        assert!(player.active_defenses.is_empty());
    }
}
