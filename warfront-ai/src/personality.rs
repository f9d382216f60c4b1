//! Faction personality archetypes and their scoring parameters.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tunable scoring parameters for one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Scales every positive score contribution.
    pub aggression_multiplier: f64,
    /// Divides the penalty for attacks below the slight-advantage tier.
    pub risk_tolerance: f64,
    /// Flat bias added to every candidate.
    pub base_score_offset: f64,
    /// Amplitude of seeded random noise added to attack scores.
    pub score_jitter: f64,
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Personality::Balanced.profile()
    }
}

/// Closed set of faction archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
    Chaotic,
    Isolationist,
    Trickster,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown personality '{0}'")]
pub struct PersonalityParseError(pub String);

impl Personality {
    pub const ALL: &'static [Self] = &[
        Self::Aggressive,
        Self::Defensive,
        Self::Balanced,
        Self::Chaotic,
        Self::Isolationist,
        Self::Trickster,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Defensive => "defensive",
            Self::Balanced => "balanced",
            Self::Chaotic => "chaotic",
            Self::Isolationist => "isolationist",
            Self::Trickster => "trickster",
        }
    }

    #[must_use]
    pub const fn profile(self) -> PersonalityProfile {
        match self {
            Self::Aggressive => PersonalityProfile {
                aggression_multiplier: 1.4,
                risk_tolerance: 1.3,
                base_score_offset: 5.0,
                score_jitter: 0.0,
            },
            Self::Defensive => PersonalityProfile {
                aggression_multiplier: 0.8,
                risk_tolerance: 2.5,
                base_score_offset: -10.0,
                score_jitter: 0.0,
            },
            Self::Balanced => PersonalityProfile {
                aggression_multiplier: 1.0,
                risk_tolerance: 2.0,
                base_score_offset: 0.0,
                score_jitter: 0.0,
            },
            Self::Chaotic => PersonalityProfile {
                aggression_multiplier: 1.2,
                risk_tolerance: 1.0,
                base_score_offset: 0.0,
                score_jitter: 8.0,
            },
            Self::Isolationist => PersonalityProfile {
                aggression_multiplier: 0.6,
                risk_tolerance: 3.0,
                base_score_offset: -20.0,
                score_jitter: 0.0,
            },
            Self::Trickster => PersonalityProfile {
                aggression_multiplier: 1.1,
                risk_tolerance: 1.8,
                base_score_offset: 0.0,
                score_jitter: 3.0,
            },
        }
    }

    /// Resolve an optional name; absent means [`Personality::Balanced`].
    ///
    /// # Errors
    ///
    /// Returns [`PersonalityParseError`] for names outside the closed set.
    pub fn resolve(name: Option<&str>) -> Result<Self, PersonalityParseError> {
        name.map_or(Ok(Self::default()), str::parse::<Self>)
    }
}

impl FromStr for Personality {
    type Err = PersonalityParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|personality| personality.key() == needle)
            .ok_or_else(|| PersonalityParseError(value.to_string()))
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_parse() {
        for personality in Personality::ALL {
            let parsed: Personality = personality.key().parse().unwrap();
            assert_eq!(parsed, *personality);
        }
        assert_eq!(
            " Aggressive ".parse::<Personality>(),
            Ok(Personality::Aggressive)
        );
    }

    #[test]
    fn unknown_names_fail_instead_of_defaulting() {
        assert_eq!(
            "berserker".parse::<Personality>(),
            Err(PersonalityParseError("berserker".to_string()))
        );
        assert_eq!(Personality::resolve(None), Ok(Personality::Balanced));
        assert!(Personality::resolve(Some("nope")).is_err());
    }

    #[test]
    fn risk_tolerance_table_matches_archetypes() {
        let tolerance = |p: Personality| p.profile().risk_tolerance;
        assert!((tolerance(Personality::Aggressive) - 1.3).abs() < f64::EPSILON);
        assert!((tolerance(Personality::Chaotic) - 1.0).abs() < f64::EPSILON);
        assert!((tolerance(Personality::Trickster) - 1.8).abs() < f64::EPSILON);
        assert!((tolerance(Personality::Balanced) - 2.0).abs() < f64::EPSILON);
        assert!((tolerance(Personality::Defensive) - 2.5).abs() < f64::EPSILON);
        assert!((tolerance(Personality::Isolationist) - 3.0).abs() < f64::EPSILON);
        assert_eq!(PersonalityProfile::default(), Personality::Balanced.profile());
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&Personality::Isolationist).unwrap();
        assert_eq!(json, "\"isolationist\"");
    }
}
