use crate::data::game_match::Match;
use crate::error::UltmaError;
use directories::BaseDirs;
use std::fs::{create_dir_all, remove_file, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

/// Keeps the active match on disk so a restarted server resumes it.
#[derive(Clone, Debug)]
pub struct MatchStore {
    path: PathBuf,
}

impl MatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|base| Path::new(base.data_dir()).join("UltMA").join("match.bin"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, game: &Match) -> Result<(), UltmaError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                create_dir_all(dir)?;
            }
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        bincode::serialize_into(writer, game)?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<Match>, UltmaError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let game = bincode::deserialize_from(BufReader::new(file))?;
        Ok(Some(game))
    }

    pub fn clear(&self) -> Result<(), UltmaError> {
        match remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
