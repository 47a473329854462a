//! Built-in recommendation catalogs.
//!
//! Music: eight tracks for each canonical category. Study: one entry per
//! category with a primary subject and three secondary candidates.

use std::collections::HashMap;

use emo_models::{EmotionCategory, MusicTrack};

/// Every track runs for the full item duration in the reference setup.
const TRACK_SECS: u32 = 600;

const HAPPY: [(&str, &str, &str); 8] = [
    ("ZbZSe6N_BXs", "Happy - Pharrell Williams", "Pharrell Williams"),
    ("ru0K8uYEZWw", "Can't Stop the Feeling! - Justin Timberlake", "Justin Timberlake"),
    ("OPf0YbXqDm0", "Uptown Funk - Mark Ronson ft. Bruno Mars", "Mark Ronson"),
    ("SmbmeSqp1hA", "Good as Hell - Lizzo", "Lizzo"),
    ("iPUmE-tne5U", "Walking on Sunshine - Katrina & The Waves", "Katrina & The Waves"),
    ("eH3giaIzONA", "I Wanna Dance with Somebody - Whitney Houston", "Whitney Houston"),
    ("xFrGuyw1V8s", "Dancing Queen - ABBA", "ABBA"),
    ("m1h1gRqa9Q", "Mr. Blue Sky - Electric Light Orchestra", "ELO"),
];

const SAD: [(&str, &str, &str); 8] = [
    ("hLQl3WQQoQ0", "Someone Like You - Adele", "Adele"),
    ("8AHCfZTRGiI", "Hurt - Johnny Cash", "Johnny Cash"),
    ("5rOiW_xY-kc", "Everybody Hurts - R.E.M.", "R.E.M."),
    ("4N3N1MlvVc4", "Mad World - Gary Jules", "Gary Jules"),
    ("4zLfCnGVeL4", "The Sound of Silence - Simon & Garfunkel", "Simon & Garfunkel"),
    ("NrgmdOz227I", "Yesterday - The Beatles", "The Beatles"),
    ("0-EF60neguk", "Nothing Compares 2 U - Sinead O'Connor", "Sinéad O'Connor"),
    ("Man4Xw8Xypo", "Blackbird - The Beatles", "The Beatles"),
];

const STRESSED: [(&str, &str, &str); 8] = [
    ("UfcAVejs1Ac", "Weightless - Marconi Union", "Marconi Union"),
    ("XgFJUv9Hbm", "Porcelain - Moby", "Moby"),
    ("u7K72X4eo_s", "Teardrop - Massive Attack", "Massive Attack"),
    ("YjtFXPSzJ4c", "Ambient 1 - Brian Eno", "Brian Eno"),
    ("WNcsUNKlAKw", "Clair de Lune - Claude Debussy", "Claude Debussy"),
    ("tYkkFuKg5yk", "Music for Airports - Brian Eno", "Brian Eno"),
    ("6v0az2KDgiw", "The Köln Concert - Keith Jarrett", "Keith Jarrett"),
    ("nFJ0FgKf8OE", "Moon Safari - Air", "Air"),
];

const NEUTRAL: [(&str, &str, &str); 8] = [
    ("yH1pLt2H-4U", "Ludovico Einaudi - Nuvole Bianche", "Ludovico Einaudi"),
    ("jdtJf3qKXno", "Ólafur Arnalds - Near Light", "Ólafur Arnalds"),
    ("u-iU7uB3mLc", "Nils Frahm - Says", "Nils Frahm"),
    ("rAg9HnXNfok", "Max Richter - On The Nature of Daylight", "Max Richter"),
    ("DwRyB0z0E9I", "Bonobo - Kong", "Bonobo"),
    ("9NJXfS2z3L4", "Ryuichi Sakamoto - Merry Christmas Mr. Lawrence", "Ryuichi Sakamoto"),
    ("o7iL2K9PNeR8", "Philip Glass - Metamorphosis", "Philip Glass"),
    ("pF2rT9PNeR8", "Arvo Pärt - Spiegel im Spiegel", "Arvo Pärt"),
];

/// Music pools keyed by canonical category.
pub fn music_catalog() -> HashMap<EmotionCategory, Vec<MusicTrack>> {
    let build = |rows: &[(&str, &str, &str)]| -> Vec<MusicTrack> {
        rows.iter()
            .map(|(id, title, artist)| MusicTrack::new(id, title, artist, TRACK_SECS))
            .collect()
    };

    HashMap::from([
        (EmotionCategory::Happy, build(&HAPPY)),
        (EmotionCategory::Sad, build(&SAD)),
        (EmotionCategory::Stressed, build(&STRESSED)),
        (EmotionCategory::Neutral, build(&NEUTRAL)),
    ])
}

/// Study guidance for one category, before selection narrows it down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyEntry {
    pub primary: String,
    pub secondary: Vec<String>,
    pub duration: String,
    pub tips: Vec<String>,
    pub reasoning: String,
}

impl StudyEntry {
    fn new(
        primary: &str,
        secondary: &[&str],
        duration: &str,
        tips: &[&str],
        reasoning: &str,
    ) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.iter().map(|s| s.to_string()).collect(),
            duration: duration.to_string(),
            tips: tips.iter().map(|s| s.to_string()).collect(),
            reasoning: reasoning.to_string(),
        }
    }
}

/// Study-subject entries keyed by canonical category.
pub fn study_catalog() -> HashMap<EmotionCategory, StudyEntry> {
    HashMap::from([
        (
            EmotionCategory::Happy,
            StudyEntry::new(
                "Advanced Programming Projects",
                &[
                    "Machine Learning Implementation",
                    "Creative Problem Solving",
                    "System Design",
                ],
                "60-90 minutes",
                &[
                    "Take advantage of high energy",
                    "Use active learning methods",
                    "Try creative approaches",
                ],
                "High energy and positive mood - perfect for tackling challenging new concepts!",
            ),
        ),
        (
            EmotionCategory::Sad,
            StudyEntry::new(
                "Mathematics Review",
                &[
                    "Theory Revision",
                    "Concept Clarification",
                    "Previous Assignments",
                ],
                "30-45 minutes",
                &[
                    "Be gentle with yourself",
                    "Focus on review rather than new material",
                    "Consider studying with a friend",
                ],
                "Low energy state - focus on review and consolidation rather than new learning.",
            ),
        ),
        (
            EmotionCategory::Stressed,
            StudyEntry::new(
                "Basic Mathematics Practice",
                &[
                    "Simple Programming Exercises",
                    "Familiar Topic Revision",
                    "Easy Problem Sets",
                ],
                "20-30 minutes",
                &[
                    "Start with easy topics to build confidence",
                    "Use relaxation techniques before studying",
                    "Avoid time pressure",
                ],
                "High stress - stick to familiar, low-pressure topics to build confidence.",
            ),
        ),
        (
            EmotionCategory::Neutral,
            StudyEntry::new(
                "Regular Coursework",
                &[
                    "Assignment Completion",
                    "Balanced Study Session",
                    "Project Development",
                ],
                "45-60 minutes",
                &[
                    "Maintain steady, consistent pace",
                    "Use proven study techniques",
                    "Balance different types of learning",
                ],
                "Balanced mood - ideal for regular study routine and steady progress.",
            ),
        ),
    ])
}
