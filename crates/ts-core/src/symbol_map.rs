use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::Color;

/// Symbole rendu pour une couleur absente de la table, ou pour un symbole vide.
pub const BLANK_SYMBOL: char = ' ';

/// Une paire (couleur, symbole). Symbole vide = espace.
///
/// # Example
/// ```
/// use ts_core::symbol_map::SymbolEntry;
/// let e = SymbolEntry::new("#ef4444", "0x");
/// assert_eq!(e.symbol, Some('0'));
/// assert_eq!(SymbolEntry::new("#fff", "").symbol_char(), ' ');
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub color: Color,
    #[serde(
        default,
        serialize_with = "serialize_symbol",
        deserialize_with = "deserialize_symbol"
    )]
    pub symbol: Option<char>,
}

impl SymbolEntry {
    /// Seul le premier caractère de `symbol` est retenu.
    #[must_use]
    pub fn new(color: impl Into<Color>, symbol: &str) -> Self {
        Self {
            color: color.into(),
            symbol: first_char(symbol),
        }
    }

    /// Symbole effectif (espace si vide).
    #[must_use]
    pub fn symbol_char(&self) -> char {
        self.symbol.unwrap_or(BLANK_SYMBOL)
    }
}

fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}

fn serialize_symbol<S: Serializer>(symbol: &Option<char>, s: S) -> Result<S::Ok, S::Error> {
    let mut buf = [0u8; 4];
    s.serialize_str(symbol.map_or("", |c| c.encode_utf8(&mut buf)))
}

fn deserialize_symbol<'de, D: Deserializer<'de>>(d: D) -> Result<Option<char>, D::Error> {
    let raw = String::deserialize(d)?;
    Ok(first_char(&raw))
}

/// Modification partielle d'une entrée ; les champs `None` sont conservés.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub color: Option<Color>,
    pub symbol: Option<Option<char>>,
}

impl EntryPatch {
    #[must_use]
    pub fn color(color: impl Into<Color>) -> Self {
        Self {
            color: Some(color.into()),
            symbol: None,
        }
    }

    /// Patch du symbole ; chaîne vide = symbole blanc.
    #[must_use]
    pub fn symbol(symbol: &str) -> Self {
        Self {
            color: None,
            symbol: Some(first_char(symbol)),
        }
    }
}

/// Table dérivée couleur → symbole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolLookup {
    map: HashMap<Color, char>,
}

impl SymbolLookup {
    /// Symbole pour `color`, espace si absent.
    #[inline]
    #[must_use]
    pub fn resolve(&self, color: Color) -> char {
        self.map.get(&color).copied().unwrap_or(BLANK_SYMBOL)
    }

    #[must_use]
    pub fn get(&self, color: Color) -> Option<char> {
        self.map.get(&color).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Paires triées par clé couleur (ordre stable pour l'affichage).
    #[must_use]
    pub fn sorted(&self) -> Vec<(Color, char)> {
        let mut pairs: Vec<(Color, char)> = self.map.iter().map(|(&c, &s)| (c, s)).collect();
        pairs.sort_unstable();
        pairs
    }
}

/// Liste ordonnée et éditable de paires couleur → symbole.
///
/// En cas de doublon de couleur, la dernière entrée gagne.
///
/// # Example
/// ```
/// use ts_core::symbol_map::{SymbolMap, SymbolEntry};
/// let mut map = SymbolMap::seeded();
/// assert_eq!(map.resolve("#EF4444"), '0');
/// map.add(SymbolEntry::new("#ef4444", "R"));
/// assert_eq!(map.resolve("#ef4444"), 'R');
/// assert_eq!(map.resolve("#123456"), ' ');
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolMap {
    entries: Vec<SymbolEntry>,
}

impl SymbolMap {
    #[must_use]
    pub fn new(entries: Vec<SymbolEntry>) -> Self {
        Self { entries }
    }

    /// Table initiale : blanc → espace, noir → `+`, rouge → `0`, vert → `1`.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![
            SymbolEntry::new("#ffffff", " "),
            SymbolEntry::new("#000000", "+"),
            SymbolEntry::new("#ef4444", "0"),
            SymbolEntry::new("#22c55e", "1"),
        ])
    }

    #[must_use]
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ajoute en fin de liste (donc prioritaire sur les doublons existants).
    pub fn add(&mut self, entry: SymbolEntry) {
        log::debug!("Mapping ajouté : {} → {:?}", entry.color, entry.symbol_char());
        self.entries.push(entry);
    }

    /// Applique `patch` à l'entrée `index`. `None` si l'index n'existe pas.
    pub fn update(&mut self, index: usize, patch: EntryPatch) -> Option<&SymbolEntry> {
        let entry = self.entries.get_mut(index)?;
        if let Some(color) = patch.color {
            entry.color = color;
        }
        if let Some(symbol) = patch.symbol {
            entry.symbol = symbol;
        }
        log::debug!(
            "Mapping {index} modifié : {} → {:?}",
            entry.color,
            entry.symbol_char()
        );
        Some(entry)
    }

    /// Retire l'entrée `index`. `None` si l'index n'existe pas.
    pub fn remove(&mut self, index: usize) -> Option<SymbolEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Dérive la table couleur → symbole par un pli ordonné : chaque entrée
    /// écrase les précédentes de même couleur.
    #[must_use]
    pub fn build_lookup(&self) -> SymbolLookup {
        let map = self
            .entries
            .iter()
            .fold(HashMap::new(), |mut acc, entry| {
                acc.insert(entry.color, entry.symbol_char());
                acc
            });
        SymbolLookup { map }
    }

    /// Table inverse symbole → couleur, cohérente avec `build_lookup` : seules
    /// les entrées gagnantes comptent, et sur un symbole partagé la couleur dont
    /// l'entrée gagnante est la plus tardive l'emporte.
    #[must_use]
    pub fn build_reverse_lookup(&self) -> HashMap<char, Color> {
        let winners: HashMap<Color, (usize, char)> = self
            .entries
            .iter()
            .enumerate()
            .fold(HashMap::new(), |mut acc, (i, entry)| {
                acc.insert(entry.color, (i, entry.symbol_char()));
                acc
            });
        let mut ordered: Vec<(usize, char, Color)> = winners
            .into_iter()
            .map(|(color, (i, symbol))| (i, symbol, color))
            .collect();
        ordered.sort_unstable_by_key(|&(i, _, _)| i);
        ordered
            .into_iter()
            .map(|(_, symbol, color)| (symbol, color))
            .collect()
    }

    /// Symbole pour `normalize(color)`, espace si non mappé.
    #[must_use]
    pub fn resolve(&self, color: impl Into<Color>) -> char {
        self.build_lookup().resolve(color.into())
    }
}
