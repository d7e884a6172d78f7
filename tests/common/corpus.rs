//! Deterministic prose for layout tests.

const WORDS: &[&str] = &[
    "the", "of", "and", "a", "to", "in", "was", "he", "that", "it", "his", "her", "with", "as",
    "had", "for", "she", "not", "at", "but", "on", "which", "you", "from", "all", "were", "they",
    "by", "this", "my", "have", "been", "upon", "would", "could", "one", "their", "said", "there",
    "whale", "ship", "captain", "sea", "ocean", "letter", "monster", "creature", "voyage",
    "extraordinary", "characteristically", "responsibility", "accessibility", "publication",
    "determined", "encounter", "providence", "navigator", "apparently", "well-known",
    "self-evident", "in\u{00AD}ter\u{00AD}na\u{00AD}tion\u{00AD}al", "cœur", "naïve", "Zürich",
];

/// Linear congruential generator; the same seed always yields the same text.
pub struct Lcg(pub u64);

impl Lcg {
    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }
}

pub fn paragraph(rng: &mut Lcg, words: usize) -> Vec<&'static str> {
    (0..words)
        .map(|_| WORDS[rng.below(WORDS.len() as u32) as usize])
        .collect()
}

/// `count` paragraphs of 5 to 120 words.
pub fn chapter(seed: u64, count: usize) -> Vec<Vec<&'static str>> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            let len = 5 + rng.below(116) as usize;
            paragraph(&mut rng, len)
        })
        .collect()
}
