use crate::data::ledger::ResourceLedger;
use crate::data::player::StartingResources;
use crate::data::potions::PotionTable;
use crate::error::UltmaError;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, read_to_string, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetAddress {
    pub host: String,
    pub port: u16,
}

impl Default for NetAddress {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
        }
    }
}

/// Match rule constants. Every field may be omitted from the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub max_players: usize,
    pub starting_life: u32,
    pub starting_shield: u32,
    pub starting_mana: u32,
    pub life_cap: u32,
    pub shield_cap: u32,
    pub mana_cap: u32,
    pub action_budget: u32,
    pub meditate_mana: u32,
    pub arena_mana_bonus: u32,
    pub brew_cost: u32,
    pub starting_spells: Vec<String>,
    pub reward_potion_on_discovery: bool,
    pub shuffle_words: bool,
    pub shuffle_potions: bool,
    pub refresh_words_after_arena: bool,
    pub seed: Option<u64>,
    pub potions: PotionTable,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_players: 4,
            starting_life: 3,
            starting_shield: 5,
            starting_mana: 5,
            life_cap: 3,
            shield_cap: 10,
            mana_cap: 5,
            action_budget: 3,
            meditate_mana: 2,
            arena_mana_bonus: 2,
            brew_cost: 1,
            starting_spells: Vec::new(),
            reward_potion_on_discovery: true,
            shuffle_words: true,
            shuffle_potions: false,
            refresh_words_after_arena: false,
            seed: None,
            potions: PotionTable::default(),
        }
    }
}

impl Rules {
    pub fn ledger(&self) -> ResourceLedger {
        ResourceLedger {
            life_cap: self.life_cap,
            shield_cap: self.shield_cap,
            mana_cap: self.mana_cap,
        }
    }

    pub fn starting_resources(&self) -> StartingResources {
        StartingResources {
            life: self.starting_life,
            shield: self.starting_shield,
            mana: self.starting_mana.min(self.mana_cap),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub enabled: bool,
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: NetAddress,
    pub rules: Rules,
    pub storage: Storage,
}

impl ServerConfig {
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|base| Path::new(base.config_dir()).join("UltMA").join("Config.toml"))
    }

    pub fn load(path: Option<&Path>) -> Result<ServerConfig, UltmaError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };
        if let Some(path) = path {
            if path.exists() {
                let string = read_to_string(path)?;
                let config = toml::from_str(&string)?;
                return Ok(config);
            }
        }
        Ok(ServerConfig::default())
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, UltmaError> {
        let string = toml::to_string_pretty(&self)?;
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path().ok_or(UltmaError::NoConfigDir)?,
        };
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                create_dir_all(dir)?;
            }
        }
        let mut file = File::create(&path)?;
        file.write_all(string.as_bytes())?;
        Ok(path)
    }
}
