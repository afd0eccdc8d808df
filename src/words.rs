//! Word corpora: common English words and quotes, embedded in the binary.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Which kind of text the player types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContentMode {
    #[default]
    Words,
    Quotes,
}

impl ContentMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Words => Self::Quotes,
            Self::Quotes => Self::Words,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Quotes => "quotes",
        }
    }
}

/// Anything that can hand out single words. The falling-words session only sees this trait.
pub trait WordSource: std::fmt::Debug {
    /// One word, never empty and without whitespace.
    fn next_word(&mut self, mode: ContentMode) -> String;
}

const COMMON_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "it", "for", "not", "on", "with",
    "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say", "her",
    "she", "or", "an", "will", "my", "one", "all", "would", "there", "their", "what", "so", "up",
    "out", "if", "about", "who", "get", "which", "go", "me", "when", "make", "can", "like", "time",
    "no", "just", "him", "know", "take", "people", "into", "year", "your", "good", "some",
    "could", "them", "see", "other", "than", "then", "now", "look", "only", "come", "its", "over",
    "think", "also", "back", "after", "use", "two", "how", "our", "work", "first", "well", "way",
    "even", "new", "want", "because", "any", "these", "give", "day", "most", "us", "great",
    "between", "need", "large", "under", "never", "each", "right", "hand", "high", "place",
    "small", "found", "still", "own", "light", "word", "went", "last", "long", "much", "before",
    "turn", "move", "real", "left", "same", "being", "world", "house", "point", "home", "old",
    "number", "start", "show", "every", "part", "find", "here", "thing", "many", "head", "name",
    "very", "through", "form", "line", "water", "been", "call", "keep", "while", "next",
    "program", "change", "room", "group", "begin", "might", "story", "along", "children", "city",
    "earth", "eye", "run", "quite", "close", "night", "open", "life", "walk", "white", "got",
    "read", "port", "spell", "add", "land", "must", "big", "act", "why", "ask", "men", "air",
    "away", "animal", "again", "study", "help", "should", "late", "above", "paper", "near",
    "grow", "food", "learn", "plant", "cover", "state", "set", "try", "face", "watch", "car",
    "seem", "sea", "draw", "hard", "let", "stop", "without", "second", "tree", "cross", "since",
    "pick", "fast", "several", "hold", "himself", "toward", "five", "step", "morning", "pass",
    "power", "town", "fine", "true", "hundred", "area", "table", "strong", "special", "mind",
    "behind", "clear", "ball", "best", "better", "dark", "rest", "early", "sort", "told",
    "money", "river", "class", "nothing", "age", "check", "game",
];

const QUOTES: &[&str] = &[
    "It is a truth universally acknowledged that a single man in possession of a good fortune must be in want of a wife",
    "The only way to do great work is to love what you do",
    "In the middle of difficulty lies opportunity",
    "Not all those who wander are lost",
    "The future belongs to those who believe in the beauty of their dreams",
    "It does not do to dwell on dreams and forget to live",
    "To be yourself in a world that is constantly trying to make you something else is the greatest accomplishment",
    "In three words I can sum up everything I learned about life it goes on",
    "The greatest glory in living lies not in never falling but in rising every time we fall",
    "Life is what happens when you are busy making other plans",
    "The way to get started is to quit talking and begin doing",
    "If you look at what you have in life you will always have more",
    "If you set your goals ridiculously high and it is a failure you will fail above everyone else success",
    "You must be the change you wish to see in the world",
    "Spread love everywhere you go let no one ever come to you without leaving happier",
    "The only thing we have to fear is fear itself",
    "Darkness cannot drive out darkness only light can do that hate cannot drive out hate only love can do that",
    "Do one thing every day that scares you",
    "Well done is better than well said",
    "The best time to plant a tree was twenty years ago the second best time is now",
    "An unexamined life is not worth living",
    "Many of life great failures are people who did not realize how close they were to success when they gave up",
    "You have brains in your head you have feet in your shoes you can steer yourself any direction you choose",
    "If life were predictable it would cease to be life and be without flavor",
    "Life is a succession of lessons which must be lived to be understood",
];

/// Embedded corpus with its own RNG.
#[derive(Debug, Clone)]
pub struct Corpus {
    rng: StdRng,
}

impl Corpus {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    /// `count` random common words.
    pub fn common_words(&mut self, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| COMMON_WORDS[self.rng.random_range(0..COMMON_WORDS.len())].to_string())
            .collect()
    }

    /// Whole random quotes split into words, until at least `min_words` are collected.
    pub fn quote_words(&mut self, min_words: usize) -> Vec<String> {
        let mut words = Vec::with_capacity(min_words + 32);
        while words.len() < min_words {
            let quote = QUOTES[self.rng.random_range(0..QUOTES.len())];
            words.extend(quote.split_whitespace().map(str::to_string));
        }
        words
    }

    /// Word list for a classic test.
    pub fn test_words(&mut self, mode: ContentMode, count: usize) -> Vec<String> {
        match mode {
            ContentMode::Words => self.common_words(count),
            ContentMode::Quotes => self.quote_words(count),
        }
    }
}

impl WordSource for Corpus {
    fn next_word(&mut self, mode: ContentMode) -> String {
        match mode {
            ContentMode::Words => {
                COMMON_WORDS[self.rng.random_range(0..COMMON_WORDS.len())].to_string()
            }
            ContentMode::Quotes => {
                let quote = QUOTES[self.rng.random_range(0..QUOTES.len())];
                let words: Vec<&str> = quote.split_whitespace().collect();
                words[self.rng.random_range(0..words.len())].to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_word_has_no_whitespace() {
        let mut corpus = Corpus::new(Some(7));
        for mode in [ContentMode::Words, ContentMode::Quotes] {
            for _ in 0..200 {
                let w = corpus.next_word(mode);
                assert!(!w.is_empty());
                assert!(!w.chars().any(char::is_whitespace), "{w:?}");
            }
        }
    }

    #[test]
    fn test_quote_words_reaches_minimum() {
        let mut corpus = Corpus::new(Some(1));
        assert!(corpus.quote_words(200).len() >= 200);
        assert_eq!(corpus.common_words(50).len(), 50);
    }

    #[test]
    fn test_same_seed_same_words() {
        let a = Corpus::new(Some(42)).common_words(20);
        let b = Corpus::new(Some(42)).common_words(20);
        assert_eq!(a, b);
    }
}
