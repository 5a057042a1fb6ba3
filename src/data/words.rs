use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerWord {
    Yngvy,
    Vorlag,
    Harkon,
    Aelith,
    Phaeton,
    Sarthel,
}

impl PowerWord {
    pub const ALL: [PowerWord; 6] = [
        PowerWord::Yngvy,
        PowerWord::Vorlag,
        PowerWord::Harkon,
        PowerWord::Aelith,
        PowerWord::Phaeton,
        PowerWord::Sarthel,
    ];

    pub fn parse(word: &str) -> Option<Self> {
        use PowerWord::*;
        match normalize(word).as_str() {
            "YNGVY" => Some(Yngvy),
            "VORLAG" => Some(Vorlag),
            "HARKON" => Some(Harkon),
            "AELITH" => Some(Aelith),
            "PHAETON" => Some(Phaeton),
            "SARTHEL" => Some(Sarthel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use PowerWord::*;
        match self {
            Yngvy => "YNGVY",
            Vorlag => "VORLAG",
            Harkon => "HARKON",
            Aelith => "AELITH",
            Phaeton => "PHAETON",
            Sarthel => "SARTHEL",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PowerWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Meaning {
    Aether,
    Rune,
    Nexus,
    Shadow,
    Forge,
    Void,
}

impl Meaning {
    pub const ALL: [Meaning; 6] = [
        Meaning::Aether,
        Meaning::Rune,
        Meaning::Nexus,
        Meaning::Shadow,
        Meaning::Forge,
        Meaning::Void,
    ];

    pub fn as_str(&self) -> &'static str {
        use Meaning::*;
        match self {
            Aether => "AETHER",
            Rune => "RUNE",
            Nexus => "NEXUS",
            Shadow => "SHADOW",
            Forge => "FORGE",
            Void => "VOID",
        }
    }
}

/// Unordered pair of meanings, stored with the smaller meaning first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeaningPair(Meaning, Meaning);

impl MeaningPair {
    pub fn new(a: Meaning, b: Meaning) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn is_doubled(&self) -> bool {
        self.0 == self.1
    }
}

pub fn normalize(word: &str) -> String {
    word.trim().to_uppercase()
}

/// The per-match word catalog: which meaning each power word carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    meanings: [Meaning; 6],
}

impl Lexicon {
    pub fn identity() -> Self {
        Self { meanings: Meaning::ALL }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut meanings = Meaning::ALL;
        meanings.shuffle(rng);
        Self { meanings }
    }

    pub fn meaning(&self, word: PowerWord) -> Meaning {
        self.meanings[word.index()]
    }

    pub fn translate(&self, word: &str) -> Option<Meaning> {
        PowerWord::parse(word).map(|word| self.meaning(word))
    }

    pub fn dictionary(&self) -> BTreeMap<String, String> {
        PowerWord::ALL
            .iter()
            .map(|word| (word.as_str().to_string(), self.meaning(*word).as_str().to_string()))
            .collect()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn parses_words_regardless_of_case_and_padding() {
        assert_eq!(PowerWord::parse("  yngvy "), Some(PowerWord::Yngvy));
        assert_eq!(PowerWord::parse("Sarthel"), Some(PowerWord::Sarthel));
        assert_eq!(PowerWord::parse("abracadabra"), None);
        assert_eq!(PowerWord::parse(""), None);
    }

    #[test]
    fn shuffled_lexicon_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let lexicon = Lexicon::shuffled(&mut rng);
        let meanings: HashSet<_> = PowerWord::ALL.iter().map(|w| lexicon.meaning(*w)).collect();
        assert_eq!(meanings.len(), Meaning::ALL.len());
    }

    #[test]
    fn meaning_pair_ignores_order() {
        assert_eq!(
            MeaningPair::new(Meaning::Void, Meaning::Aether),
            MeaningPair::new(Meaning::Aether, Meaning::Void)
        );
        assert!(MeaningPair::new(Meaning::Rune, Meaning::Rune).is_doubled());
    }

    #[test]
    fn dictionary_lists_every_word() {
        let dictionary = Lexicon::identity().dictionary();
        assert_eq!(dictionary.len(), 6);
        assert_eq!(dictionary.get("YNGVY").map(String::as_str), Some("AETHER"));
    }
}
