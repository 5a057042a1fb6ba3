use super::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Life,
    Shield,
    Mana,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    pub shield_before: u32,
    pub shield_after: u32,
    pub life_before: u32,
    pub life_after: u32,
}

impl DamageReport {
    pub fn total(&self) -> u32 {
        (self.shield_before - self.shield_after) + (self.life_before - self.life_after)
    }

    pub fn unchanged(player: &Player) -> Self {
        Self {
            shield_before: player.magic_shield,
            shield_after: player.magic_shield,
            life_before: player.life_energy,
            life_after: player.life_energy,
        }
    }
}

/// Bounded arithmetic over a player's life, shield and mana.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceLedger {
    pub life_cap: u32,
    pub shield_cap: u32,
    pub mana_cap: u32,
}

impl ResourceLedger {
    pub fn apply_damage(&self, player: &mut Player, amount: u32) -> DamageReport {
        let shield_before = player.magic_shield;
        let life_before = player.life_energy;
        let absorbed = amount.min(shield_before);
        player.magic_shield = shield_before - absorbed;
        player.life_energy = life_before.saturating_sub(amount - absorbed);
        self.check_elimination(player);
        DamageReport {
            shield_before,
            shield_after: player.magic_shield,
            life_before,
            life_after: player.life_energy,
        }
    }

    pub fn adjust_mana(&self, player: &mut Player, delta: i64) {
        player.mana = clamp(player.mana, delta, self.mana_cap);
    }

    pub fn restore(&self, player: &mut Player, resource: Resource, amount: i64) {
        match resource {
            Resource::Life => {
                if player.is_eliminated {
                    return;
                }
                player.life_energy = clamp(player.life_energy, amount, self.life_cap);
                self.check_elimination(player);
            }
            Resource::Shield => player.magic_shield = clamp(player.magic_shield, amount, self.shield_cap),
            Resource::Mana => self.adjust_mana(player, amount),
        }
    }

    pub fn can_afford(&self, player: &Player, cost: u32) -> bool {
        player.mana >= cost
    }

    fn check_elimination(&self, player: &mut Player) {
        if player.life_energy == 0 {
            player.is_eliminated = true;
        }
    }
}

fn clamp(value: u32, delta: i64, cap: u32) -> u32 {
    (value as i64 + delta).clamp(0, cap.max(value) as i64) as u32
}
