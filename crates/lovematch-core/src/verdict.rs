use crate::scorer::SOULMATE_SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Soulmates,
    Perfect,
    Great,
    Good,
    Decent,
    NotGreat,
    JustFriends,
}

impl Verdict {
    pub fn for_score(score: u16) -> Self {
        match score {
            SOULMATE_SCORE => Self::Soulmates,
            s if s >= 90 => Self::Perfect,
            s if s >= 75 => Self::Great,
            s if s >= 60 => Self::Good,
            s if s >= 40 => Self::Decent,
            s if s >= 20 => Self::NotGreat,
            _ => Self::JustFriends,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Soulmates => "soulmates",
            Self::Perfect => "perfect",
            Self::Great => "great",
            Self::Good => "good",
            Self::Decent => "decent",
            Self::NotGreat => "not_great",
            Self::JustFriends => "just_friends",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Soulmates => {
                "A match made in heaven! Your love transcends all boundaries! 💖✨\n Biah Kar lo na Ji"
            }
            Self::Perfect => "Perfect match! You were destined to be together! ✨",
            Self::Great => "Great match! Your love has amazing potential! 💖",
            Self::Good => "Good match! You have a strong connection! 😊",
            Self::Decent => "Decent match. You might need to work on your relationship. 🌱",
            Self::NotGreat => "Not a great match. But opposites sometimes attract! 🤔",
            Self::JustFriends => "Maybe just be friends? The stars aren't aligned for romance. 🌟",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(Verdict::for_score(1000), Verdict::Soulmates);
        assert_eq!(Verdict::for_score(100), Verdict::Perfect);
        assert_eq!(Verdict::for_score(90), Verdict::Perfect);
        assert_eq!(Verdict::for_score(89), Verdict::Great);
        assert_eq!(Verdict::for_score(75), Verdict::Great);
        assert_eq!(Verdict::for_score(60), Verdict::Good);
        assert_eq!(Verdict::for_score(59), Verdict::Decent);
        assert_eq!(Verdict::for_score(20), Verdict::NotGreat);
        assert_eq!(Verdict::for_score(19), Verdict::JustFriends);
        assert_eq!(Verdict::for_score(0), Verdict::JustFriends);
    }

    #[test]
    fn scores_between_hundred_and_soulmate_stay_perfect() {
        assert_eq!(Verdict::for_score(500), Verdict::Perfect);
        assert!(Verdict::for_score(0).message().starts_with("Maybe just be friends"));
    }

    #[test]
    fn soulmate_message_keeps_both_lines() {
        let message = Verdict::Soulmates.message();
        assert!(message.starts_with("A match made in heaven!"));
        assert!(message.ends_with("\n Biah Kar lo na Ji"));
    }
}
