//! Word supply for rounds.

use rand::seq::IndexedRandom;

/// Source of the hidden word for each round.
///
/// Injected into the server at build time so tests can substitute a
/// fixed supplier. Implementations must return a non-empty word on
/// every call; the room refuses to start a round on an empty word.
pub trait WordSupplier: Send + Sync + 'static {
    /// Picks the word for a new round.
    fn next_word(&self) -> String;
}

/// Everyday French words that are reasonable to draw.
const WORDS: &[&str] = &[
    "Chat",
    "Chien",
    "Maison",
    "Arbre",
    "Voiture",
    "Soleil",
    "Lune",
    "Étoile",
    "Montagne",
    "Rivière",
    "Plage",
    "Cerf-volant",
    "Bateau",
    "Train",
    "Avion",
    "Ballon",
    "Livre",
    "Ordinateur",
    "Téléphone",
    "Caméra",
    "Montre",
    "Tasse",
    "Fleurs",
    "Gâteau",
    "Chocolat",
    "Pizza",
    "Hamburger",
    "Glace",
    "Fromage",
    "Salade",
    "Paysage",
    "Musique",
    "Danse",
    "Peinture",
    "Film",
    "Jeu",
    "Robot",
    "Monstre",
    "Super-héros",
    "Pirate",
    "Sirène",
    "Fée",
    "Château",
    "Dragon",
    "Safari",
    "École",
    "Sport",
    "Voyage",
    "Vacances",
    "Amis",
];

/// The builtin vocabulary, drawn from uniformly at random.
///
/// No anti-repeat guard: the same word can come up in back-to-back
/// rounds.
pub struct WordList {
    words: &'static [&'static str],
}

impl WordList {
    /// Creates a supplier over the builtin vocabulary.
    pub fn new() -> Self {
        Self { words: WORDS }
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSupplier for WordList {
    fn next_word(&self) -> String {
        self.words
            .choose(&mut rand::rng())
            .copied()
            // The builtin list is never empty; this keeps the method
            // total without a panic path.
            .unwrap_or("croquis")
            .to_owned()
    }
}
