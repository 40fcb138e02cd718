use std::collections::HashSet;

pub const MAX_SCORE: u16 = 100;

/// Score of the one pairing that sits above the percentage scale.
pub const SOULMATE_SCORE: u16 = 1000;

const DIFF_DECAY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrder {
    /// Matches only when the names arrive as `(first, second)`.
    Exact,
    Either,
}

/// A literal table entry checked against normalized names before the formula runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideRule {
    pub first: &'static str,
    pub second: &'static str,
    pub order: PairOrder,
    pub score: u16,
}

impl OverrideRule {
    pub fn matches(&self, n1: &str, n2: &str) -> bool {
        if n1 == self.first && n2 == self.second {
            return true;
        }
        self.order == PairOrder::Either && n1 == self.second && n2 == self.first
    }
}

// Only the first entry is order-independent. The others stay keyed on the
// ordered pair until someone confirms the reverse order should match too.
static OVERRIDES: [OverrideRule; 4] = [
    OverrideRule {
        first: "suruchi",
        second: "abhijeet",
        order: PairOrder::Either,
        score: SOULMATE_SCORE,
    },
    OverrideRule {
        first: "suruchi",
        second: "rohan",
        order: PairOrder::Exact,
        score: 0,
    },
    OverrideRule {
        first: "sonali",
        second: "harsh",
        order: PairOrder::Exact,
        score: 100,
    },
    OverrideRule {
        first: "siya",
        second: "abhijeet",
        order: PairOrder::Exact,
        score: 85,
    },
];

pub fn overrides() -> &'static [OverrideRule] {
    &OVERRIDES
}

pub fn find_override(n1: &str, n2: &str) -> Option<&'static OverrideRule> {
    OVERRIDES.iter().find(|rule| rule.matches(n1, n2))
}

/// How a score was reached. `Formula` carries every intermediate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreBreakdown {
    Override {
        rule: OverrideRule,
    },
    Formula {
        letter_scores: (u32, u32),
        diff: u32,
        diff_factor: u16,
        common_letters: usize,
        total_unique_letters: usize,
        common_factor: u16,
        score: u16,
    },
}

impl ScoreBreakdown {
    pub fn score(&self) -> u16 {
        match self {
            Self::Override { rule } => rule.score,
            Self::Formula { score, .. } => *score,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override { .. })
    }
}

pub fn normalize_name(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact.to_lowercase()
}

pub fn letter_score(normalized: &str) -> u32 {
    normalized
        .chars()
        .filter(char::is_ascii_lowercase)
        .map(|c| u32::from(c) - u32::from('a') + 1)
        .sum()
}

pub fn diff_factor(diff: u32) -> u16 {
    let decayed = (-f64::from(diff) / DIFF_DECAY).exp() * 100.0;
    decayed.floor().clamp(0.0, f64::from(MAX_SCORE)) as u16
}

pub fn common_factor(common_letters: usize, total_unique_letters: usize) -> u16 {
    if total_unique_letters == 0 {
        return 0;
    }
    let ratio = common_letters as f64 / total_unique_letters as f64;
    (ratio * 100.0).floor().clamp(0.0, f64::from(MAX_SCORE)) as u16
}

pub fn breakdown(name1: &str, name2: &str) -> ScoreBreakdown {
    let n1 = normalize_name(name1);
    let n2 = normalize_name(name2);

    if let Some(rule) = find_override(&n1, &n2) {
        return ScoreBreakdown::Override { rule: *rule };
    }

    let letter_scores = (letter_score(&n1), letter_score(&n2));
    let diff = letter_scores.0.abs_diff(letter_scores.1);
    let diff_factor = diff_factor(diff);

    let set1: HashSet<char> = n1.chars().collect();
    let set2: HashSet<char> = n2.chars().collect();
    let common_letters = set1.intersection(&set2).count();
    let total_unique_letters = set1.union(&set2).count();
    let common_factor = common_factor(common_letters, total_unique_letters);

    let raw = (diff_factor + common_factor) / 2;

    ScoreBreakdown::Formula {
        letter_scores,
        diff,
        diff_factor,
        common_letters,
        total_unique_letters,
        common_factor,
        score: raw.min(MAX_SCORE),
    }
}

/// Compatibility of two names: `0..=100`, or an override table value.
pub fn score(name1: &str, name2: &str) -> u16 {
    breakdown(name1, name2).score()
}
