use super::potions::PotionColor;
use super::spells::{AttackStats, DefenseStats, Spell, SpellKind};
use super::words::Meaning::*;
use super::words::{Meaning, MeaningPair};
use lazy_static::lazy_static;

fn attack(name: &str, cost: u32, damage: u32, blocked_by: &[&str], amplified_by: Option<&str>, description: &str) -> Spell {
    Spell {
        name: name.to_string(),
        cost,
        description: description.to_string(),
        kind: SpellKind::Attack(AttackStats {
            damage,
            mana_drain: 0,
            blocked_by: blocked_by.iter().map(|s| s.to_string()).collect(),
            amplified_by: amplified_by.map(str::to_string),
        }),
        combination: None,
    }
}

fn curse(name: &str, cost: u32, mana_drain: u32, damage: u32, description: &str) -> Spell {
    Spell {
        name: name.to_string(),
        cost,
        description: description.to_string(),
        kind: SpellKind::Attack(AttackStats {
            damage,
            mana_drain,
            blocked_by: Vec::new(),
            amplified_by: None,
        }),
        combination: None,
    }
}

fn defense(name: &str, cost: u32, shield_bonus: u32, description: &str) -> Spell {
    Spell {
        name: name.to_string(),
        cost,
        description: description.to_string(),
        kind: SpellKind::Defense(DefenseStats { shield_bonus }),
        combination: None,
    }
}

fn utility(name: &str, cost: u32, description: &str) -> Spell {
    Spell {
        name: name.to_string(),
        cost,
        description: description.to_string(),
        kind: SpellKind::Utility,
        combination: None,
    }
}

fn combine(spell: Spell, a: Meaning, b: Meaning) -> Spell {
    Spell {
        combination: Some(MeaningPair::new(a, b)),
        ..spell
    }
}

lazy_static! {
    pub static ref SPELLS: Vec<Spell> = vec![
        combine(
            attack("Fireball", 2, 2, &["Water Wall"], Some("Water Wall"), "Damage (blocked by Water Wall)"),
            Aether,
            Rune
        ),
        combine(
            attack("Ice Lance", 2, 2, &["Fire Barrier"], Some("Fire Barrier"), "Damage (blocked by Fire Barrier)"),
            Aether,
            Nexus
        ),
        combine(
            attack("Cutting Wind", 2, 2, &["Stone Armor"], Some("Stone Armor"), "Damage (blocked by Stone Armor)"),
            Aether,
            Shadow
        ),
        combine(
            attack("Earth Fury", 2, 2, &["Levitation"], Some("Levitation"), "Damage (blocked by Levitation)"),
            Forge,
            Nexus
        ),
        combine(curse("Void Curse", 2, 3, 1, "Drains 3 mana, or 1 life once mana runs dry"), Rune, Void),
        combine(defense("Fire Barrier", 1, 0, "Defense (doubles Ice Lance damage)"), Aether, Forge),
        combine(defense("Water Wall", 1, 0, "Defense (doubles Fireball damage)"), Nexus, Rune),
        combine(defense("Stone Armor", 1, 0, "Defense (doubles Cutting Wind damage)"), Forge, Rune),
        combine(defense("Levitation", 1, 0, "Defense (doubles Earth Fury damage)"), Shadow, Void),
        combine(defense("Vacuum Shield", 3, 1, "+1 temporary shield"), Forge, Void),
        combine(utility("Dispel", 3, "Removes an artifact or potion, or cancels scrying"), Aether, Void),
        combine(utility("Hide Presence", 1, "Prevents duels and scrying"), Rune, Shadow),
        combine(utility("Mind Sight", 2, "Learns the target's power words"), Nexus, Shadow),
        combine(utility("Mana Transfer", 1, "Steals 2 mana"), Nexus, Void),
        combine(utility("Clairvoyance", 1, "Reveals information"), Forge, Shadow),
        attack("Arcane Shot", 1, 1, &["Arcane Protection"], None, "Damage (blocked by Arcane Protection)"),
        defense("Arcane Protection", 1, 0, "Defense against Arcane Shot"),
        utility("Teleport", 1, "Moves the caster elsewhere"),
        utility("Portal", 1, "Opens a passage between chambers"),
    ];
    pub static ref BREWS: Vec<(MeaningPair, PotionColor)> = vec![
        (MeaningPair::new(Aether, Forge), PotionColor::Red),
        (MeaningPair::new(Nexus, Rune), PotionColor::Blue),
        (MeaningPair::new(Rune, Shadow), PotionColor::Green),
        (MeaningPair::new(Forge, Void), PotionColor::Purple),
        (MeaningPair::new(Aether, Rune), PotionColor::Pink),
        (MeaningPair::new(Shadow, Void), PotionColor::White),
        (MeaningPair::new(Aether, Nexus), PotionColor::Red),
        (MeaningPair::new(Forge, Nexus), PotionColor::Blue),
        (MeaningPair::new(Aether, Shadow), PotionColor::Green),
        (MeaningPair::new(Nexus, Void), PotionColor::Purple),
        (MeaningPair::new(Aether, Void), PotionColor::White),
        (MeaningPair::new(Rune, Void), PotionColor::Pink),
    ];
}
