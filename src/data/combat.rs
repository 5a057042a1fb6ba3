use super::error::GameError;
use super::ledger::{DamageReport, Resource, ResourceLedger};
use super::player::Player;
use super::spells::{AttackStats, Grimoire, Spell, SpellKind, SpellResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelResult {
    pub success: bool,
    pub attacker_id: Uuid,
    pub target_id: Uuid,
    pub spell_name: String,
    pub damage_dealt: u32,
    pub target_shield_before: u32,
    pub target_shield_after: u32,
    pub target_life_before: u32,
    pub target_life_after: u32,
    pub was_blocked: bool,
    pub blocking_spell: Option<String>,
}

impl DuelResult {
    fn new(attacker: &Player, target: &Player, spell: &Spell, report: DamageReport) -> Self {
        Self {
            success: true,
            attacker_id: attacker.id,
            target_id: target.id,
            spell_name: spell.name.clone(),
            damage_dealt: report.total(),
            target_shield_before: report.shield_before,
            target_shield_after: report.shield_after,
            target_life_before: report.life_before,
            target_life_after: report.life_after,
            was_blocked: false,
            blocking_spell: None,
        }
    }

    fn blocked(attacker: &Player, target: &Player, spell: &Spell, blocking_spell: String) -> Self {
        Self {
            success: false,
            damage_dealt: 0,
            was_blocked: true,
            blocking_spell: Some(blocking_spell),
            ..Self::new(attacker, target, spell, DamageReport::unchanged(target))
        }
    }
}

pub struct CombatResolver<'a> {
    pub grimoire: &'a Grimoire,
    pub ledger: ResourceLedger,
}

impl<'a> CombatResolver<'a> {
    fn attack_spell(&self, attacker: &Player, spell_name: &str) -> Result<(&'a Spell, &'a AttackStats), GameError> {
        if !attacker.knows(spell_name) {
            return Err(GameError::validation(format!("{} does not know {}", attacker.name, spell_name)));
        }
        let grimoire: &'a Grimoire = self.grimoire;
        let spell = grimoire
            .spell(spell_name)
            .ok_or_else(|| GameError::validation(format!("unknown spell '{}'", spell_name)))?;
        match spell.kind {
            SpellKind::Attack(ref stats) => Ok((spell, stats)),
            _ => Err(GameError::validation(format!("{} is not an attack spell", spell.name))),
        }
    }

    pub fn check_attack(&self, attacker: &Player, target: &Player, spell_name: &str) -> Result<&'a Spell, GameError> {
        if attacker.id == target.id {
            return Err(GameError::validation("a wizard cannot attack themselves"));
        }
        if attacker.is_eliminated {
            return Err(GameError::validation(format!("{} has been eliminated", attacker.name)));
        }
        let (spell, _) = self.attack_spell(attacker, spell_name)?;
        if target.is_eliminated {
            return Err(GameError::validation(format!("{} has already been eliminated", target.name)));
        }
        if !self.ledger.can_afford(attacker, spell.cost) {
            return Err(GameError::validation(format!("not enough mana to cast {}", spell.name)));
        }
        Ok(spell)
    }

    pub fn attack(&self, attacker: &mut Player, target: &mut Player, spell_name: &str) -> Result<DuelResult, GameError> {
        let spell = self.check_attack(attacker, target, spell_name)?;
        let (_, stats) = self.attack_spell(attacker, spell_name)?;
        self.ledger.adjust_mana(attacker, -(spell.cost as i64));

        let blocker = target.active_defenses.iter().find(|defense| spell.is_blocked_by(defense)).cloned();
        if let Some(blocking_spell) = blocker {
            target.consume_defense(&blocking_spell);
            return Ok(DuelResult::blocked(attacker, target, spell, blocking_spell));
        }

        let mut damage = stats.damage;
        if let Some(ref amplifier) = stats.amplified_by {
            if attacker.has_defense(amplifier) {
                damage *= 2;
            }
        }
        let report = if stats.mana_drain > 0 {
            let mana_before = target.mana;
            self.ledger.adjust_mana(target, -(stats.mana_drain as i64));
            if target.mana == 0 && mana_before > 0 {
                self.ledger.apply_damage(target, damage)
            } else {
                DamageReport::unchanged(target)
            }
        } else {
            self.ledger.apply_damage(target, damage)
        };
        Ok(DuelResult::new(attacker, target, spell, report))
    }

    pub fn check_defense(&self, player: &Player, spell_name: &str) -> Result<&'a Spell, GameError> {
        if !player.knows(spell_name) {
            return Err(GameError::validation(format!("{} does not know {}", player.name, spell_name)));
        }
        let grimoire: &'a Grimoire = self.grimoire;
        let spell = grimoire
            .spell(spell_name)
            .ok_or_else(|| GameError::validation(format!("unknown spell '{}'", spell_name)))?;
        if !matches!(spell.kind, SpellKind::Defense(_)) {
            return Err(GameError::validation(format!("{} is not a defense spell", spell.name)));
        }
        if player.has_defense(&spell.name) {
            return Err(GameError::validation(format!("{} is already active", spell.name)));
        }
        if !self.ledger.can_afford(player, spell.cost) {
            return Err(GameError::validation(format!("not enough mana to activate {}", spell.name)));
        }
        Ok(spell)
    }

    pub fn activate_defense(&self, player: &mut Player, spell_name: &str) -> Result<SpellResult, GameError> {
        let spell = self.check_defense(player, spell_name)?;
        self.ledger.adjust_mana(player, -(spell.cost as i64));
        player.active_defenses.push(spell.name.clone());
        if let SpellKind::Defense(ref stats) = spell.kind {
            if stats.shield_bonus > 0 {
                self.ledger.restore(player, Resource::Shield, stats.shield_bonus as i64);
            }
        }
        Ok(SpellResult {
            description: "Defense activated!".to_string(),
            ..SpellResult::succeeded(spell)
        })
    }
}
