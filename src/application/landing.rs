//! Fixed copy and layout data for the landing page.

use serde::Serialize;
use time::Date;

use crate::domain::{
    booking::{Device, Language, MessagingLink},
    decor::{Coin, hero_coins},
    scroll::RevealConfig,
};

pub struct Program {
    pub level: &'static str,
    pub description: &'static str,
    pub features: [&'static str; 4],
    pub highlight: bool,
}

pub const PROGRAMS: [Program; 3] = [
    Program {
        level: "Beginner",
        description: "Perfect for young minds starting their chess journey",
        features: [
            "Basic rules and piece movements",
            "Opening principles",
            "Simple tactics and strategies",
            "Fun learning approach",
        ],
        highlight: false,
    },
    Program {
        level: "Intermediate",
        description: "For players ready to enhance their competitive edge",
        features: [
            "Advanced tactics and combinations",
            "Middle game strategies",
            "Endgame techniques",
            "Tournament preparation",
        ],
        highlight: true,
    },
    Program {
        level: "Advanced",
        description: "Elite training for aspiring champions",
        features: [
            "Opening repertoire development",
            "Deep positional understanding",
            "Master-level analysis",
            "Competitive tournament training",
        ],
        highlight: false,
    },
];

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 4] = [
    Feature {
        title: "International Coaches",
        description: "Learn from FIDE rated coaches with proven track records in competitive chess.",
    },
    Feature {
        title: "Small Batches",
        description: "Personalized attention with only 3-4 students per batch for optimal learning.",
    },
    Feature {
        title: "Strategic Thinking",
        description: "Build confidence, discipline, and critical thinking skills that last a lifetime.",
    },
    Feature {
        title: "Proven Results",
        description: "Track record of students excelling in tournaments and academic performance.",
    },
];

pub struct Review {
    pub parent: &'static str,
    pub child: &'static str,
    pub text: &'static str,
    pub rating: u8,
}

impl Review {
    pub fn stars(&self) -> String {
        "★".repeat(usize::from(self.rating))
    }
}

pub const REVIEWS: [Review; 6] = [
    Review {
        parent: "Priya Sharma",
        child: "Aarav (Age 7)",
        text: "My son's concentration has improved drastically. The coaches are patient and make chess fun!",
        rating: 5,
    },
    Review {
        parent: "Rajesh Kumar",
        child: "Diya (Age 9)",
        text: "Best decision we made! Diya now thinks strategically in everything she does.",
        rating: 5,
    },
    Review {
        parent: "Anita Desai",
        child: "Rohan (Age 6)",
        text: "The small batch size ensures personal attention. Rohan loves his classes!",
        rating: 5,
    },
    Review {
        parent: "Vikram Reddy",
        child: "Sara (Age 8)",
        text: "World-class coaching at home. Sara has won her first tournament already!",
        rating: 5,
    },
    Review {
        parent: "Meera Iyer",
        child: "Arjun (Age 10)",
        text: "The FIDE-rated coaches bring international standards to every lesson.",
        rating: 5,
    },
    Review {
        parent: "Suresh Patel",
        child: "Ananya (Age 7)",
        text: "Chess has boosted her confidence and problem-solving skills tremendously.",
        rating: 5,
    },
];

pub struct Achievement {
    pub student: &'static str,
    pub title: &'static str,
}

pub const ACHIEVEMENTS: [Achievement; 7] = [
    Achievement {
        student: "Aarav",
        title: "District U10 Champion",
    },
    Achievement {
        student: "Meera",
        title: "State Silver Medalist",
    },
    Achievement {
        student: "Dev",
        title: "Rapid Chess U12 Winner",
    },
    Achievement {
        student: "Rohan",
        title: "Inter-school Finalist",
    },
    Achievement {
        student: "Isha",
        title: "U8 Gold Medal",
    },
    Achievement {
        student: "Akash",
        title: "National Qualifier",
    },
    Achievement {
        student: "Nikhil",
        title: "Blitz Tournament Winner",
    },
];

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: [Faq; 8] = [
    Faq {
        question: "What's the ideal age to start learning chess?",
        answer: "Children as young as 5 can start learning chess basics. At this age, they begin to understand patterns, logic, and planning, which makes it a great time to develop foundational skills.",
    },
    Faq {
        question: "Who will be coaching my child?",
        answer: "All sessions are handled by certified chess coaches with years of experience in mentoring students across beginner, intermediate, and advanced levels.",
    },
    Faq {
        question: "How do I know my child's level of chess knowledge?",
        answer: "Our FREE Demo Session includes a brief assessment to measure your child's understanding of chess. Based on this, we recommend the right course level for effective learning.",
    },
    Faq {
        question: "How important is having the right chess coach for my child?",
        answer: "A good chess coach helps children think strategically and creatively while building discipline, patience, and sportsmanship, all crucial for long-term growth.",
    },
    Faq {
        question: "How soon can my child start participating in tournaments?",
        answer: "After gaining confidence with foundational strategies and practice games, most students start participating in tournaments within 3 to 6 months.",
    },
    Faq {
        question: "Can I track my child's progress?",
        answer: "Yes, parents receive regular progress reports and performance breakdowns after every evaluation phase, helping them track their child's chess growth clearly.",
    },
    Faq {
        question: "Do you provide online and offline chess classes?",
        answer: "Yes. We provide both online and offline classes depending on your location and convenience, ensuring the same quality of coaching in both formats.",
    },
    Faq {
        question: "What makes Chan Chess Club different?",
        answer: "We blend strategy, mentorship, and performance tracking. Our structured learning approach ensures every student becomes a confident, tournament-ready player.",
    },
];

/// Pinning and reveal numbers for the achievements strip, handed to the
/// page script through `data-` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseConfig {
    pub multiplier: f64,
    pub reveal_threshold: f64,
    pub stagger_ms: u32,
    pub duration_ms: u32,
    pub hidden_scale: f64,
    pub hidden_offset_y: f64,
}

impl ShowcaseConfig {
    pub const ACHIEVEMENTS_MULTIPLIER: f64 = 1.5;

    pub fn achievements() -> Self {
        Self::new(Self::ACHIEVEMENTS_MULTIPLIER, RevealConfig::default())
    }

    pub fn new(multiplier: f64, reveal: RevealConfig) -> Self {
        Self {
            multiplier,
            reveal_threshold: reveal.threshold,
            stagger_ms: reveal.stagger_ms,
            duration_ms: reveal.duration_ms,
            hidden_scale: reveal.hidden.scale,
            hidden_offset_y: reveal.hidden.translate_y,
        }
    }
}

/// Organisation details shown in the hero, contact block and footer.
#[derive(Debug, Clone)]
pub struct SiteIdentity {
    pub organization: String,
    pub tagline: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub contact_address: String,
}

/// Everything the landing template renders.
pub struct LandingContent {
    pub identity: SiteIdentity,
    pub established: &'static str,
    pub programs: &'static [Program],
    pub features: &'static [Feature],
    pub reviews: &'static [Review],
    pub achievements: &'static [Achievement],
    pub faqs: &'static [Faq],
    pub showcase: ShowcaseConfig,
    pub coins: Vec<Coin>,
    pub devices: [Device; 4],
    pub languages: [Language; 3],
    pub chat_link: String,
}

#[derive(Debug, Clone)]
pub struct LandingService {
    identity: SiteIdentity,
    link: MessagingLink,
}

impl LandingService {
    pub fn new(identity: SiteIdentity, link: MessagingLink) -> Self {
        Self { identity, link }
    }

    pub fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    /// Assemble the page. Coin tints are seeded from the date, so they vary
    /// from day to day but stay put within one.
    pub fn content(&self, today: Date) -> LandingContent {
        let seed = u64::try_from(today.to_julian_day()).unwrap_or_default();
        LandingContent {
            identity: self.identity.clone(),
            established: "Est. 2021 • FIDE Rated Coaches",
            programs: &PROGRAMS,
            features: &FEATURES,
            reviews: &REVIEWS,
            achievements: &ACHIEVEMENTS,
            faqs: &FAQS,
            showcase: ShowcaseConfig::achievements(),
            coins: hero_coins(seed),
            devices: Device::ALL,
            languages: Language::ALL,
            chat_link: self.link.chat_link(),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::decor::Tint;

    fn service() -> LandingService {
        LandingService::new(
            SiteIdentity {
                organization: "Chan Chess Club".into(),
                tagline: "Shaping Global Thinkers Through Chess".into(),
                contact_phone: "+91 63795 97908".into(),
                contact_email: "chanchessclub64@gmail.com".into(),
                contact_address: "Hosur".into(),
            },
            MessagingLink::new("whatsapp", "916379597908"),
        )
    }

    #[test]
    fn exactly_one_program_is_highlighted() {
        let highlighted: Vec<_> = PROGRAMS
            .iter()
            .filter(|program| program.highlight)
            .map(|program| program.level)
            .collect();
        assert_eq!(highlighted, vec!["Intermediate"]);
    }

    #[test]
    fn achievements_showcase_uses_the_slower_pin() {
        let config = ShowcaseConfig::achievements();
        assert_eq!(config.multiplier, 1.5);
        assert_eq!(config.reveal_threshold, 0.2);
        assert_eq!(config.stagger_ms, 150);
    }

    #[test]
    fn content_is_stable_within_a_day() {
        let today = date!(2025 - 10 - 27);
        let first = service().content(today);
        let second = service().content(today);
        assert_eq!(first.coins, second.coins);
        assert!(first.coins.iter().all(|coin| Tint::ALL.contains(&coin.tint)));
        assert_eq!(first.chat_link, "https://wa.me/916379597908");
        assert_eq!(first.achievements.len(), 7);
        assert_eq!(first.faqs.len(), 8);
    }
}
