use super::config::ScoringRules;
use super::error::ScoringError;
use super::types::{AwardPick, LeaguePicks, MatchScore, Outcome, LEAGUE_FIELDS};

/// Parse a goal count. Only plain ASCII digits are accepted: signs,
/// whitespace and decimals are rejected, never coerced.
pub fn parse_score(field: &'static str, raw: &str) -> Result<u32, ScoringError> {
    if raw.trim().is_empty() {
        return Err(ScoringError::MissingField { field });
    }
    let invalid = || ScoringError::InvalidScore {
        field,
        value: raw.to_string(),
    };
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

/// Accept a required name pick. The value is kept exactly as given; only a
/// blank value counts as missing.
pub fn require_pick(field: &'static str, raw: &str) -> Result<String, ScoringError> {
    if raw.trim().is_empty() {
        Err(ScoringError::MissingField { field })
    } else {
        Ok(raw.to_string())
    }
}

impl MatchScore {
    pub fn parse(home: &str, away: &str) -> Result<Self, ScoringError> {
        Ok(Self {
            home: parse_score("home", home)?,
            away: parse_score("away", away)?,
        })
    }
}

impl LeaguePicks {
    pub fn parse(
        champion: &str,
        top_scorer: &str,
        top_assist: &str,
        mvp: &str,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            champion: require_pick("champion", champion)?,
            top_scorer: require_pick("top_scorer", top_scorer)?,
            top_assist: require_pick("top_assist", top_assist)?,
            mvp: require_pick("mvp", mvp)?,
        })
    }
}

impl AwardPick {
    pub fn parse(winner: &str) -> Result<Self, ScoringError> {
        Ok(Self {
            winner: require_pick("winner", winner)?,
        })
    }
}

impl Outcome {
    /// Re-check picks that did not come through the parsers, e.g. ones read
    /// back from a hand-edited season file. Blank names are rejected.
    pub fn check_picks(&self) -> Result<(), ScoringError> {
        match self {
            Outcome::Match(_) => Ok(()),
            Outcome::League(picks) => {
                require_pick("champion", &picks.champion)?;
                require_pick("top_scorer", &picks.top_scorer)?;
                require_pick("top_assist", &picks.top_assist)?;
                require_pick("mvp", &picks.mvp)?;
                Ok(())
            }
            Outcome::Award(pick) => {
                require_pick("winner", &pick.winner)?;
                Ok(())
            }
        }
    }
}

/// Largest per-field league value whose four-field total still fits a `u32`.
pub const MAX_LEAGUE_PICK: u32 = u32::MAX / LEAGUE_FIELDS;

/// Validate scoring rules at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_rules(rules: &ScoringRules) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // A correct result must be worth something, or "correct" and "points"
    // would disagree in the aggregates.
    if rules.correct_result == 0 {
        errors.push("scoring.correct_result: must be greater than zero".to_string());
    }

    if rules.exact_score < rules.correct_result {
        errors.push(format!(
            "scoring.exact_score: must be at least correct_result ({}), got {}",
            rules.correct_result, rules.exact_score
        ));
    }

    if rules.league_pick == 0 {
        errors.push("scoring.league_pick: must be greater than zero".to_string());
    } else if rules.league_pick > MAX_LEAGUE_PICK {
        errors.push(format!(
            "scoring.league_pick: must be at most {}, got {}",
            MAX_LEAGUE_PICK, rules.league_pick
        ));
    }

    if rules.award_winner == 0 {
        errors.push("scoring.award_winner: must be greater than zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_valid() {
        assert_eq!(parse_score("home", "3"), Ok(3));
        assert_eq!(parse_score("home", "0"), Ok(0));
    }

    #[test]
    fn test_parse_score_rejects_sign_and_padding() {
        for raw in ["+3", " 0 ", "3 ", "\t1"] {
            assert_eq!(
                parse_score("home", raw),
                Err(ScoringError::InvalidScore {
                    field: "home",
                    value: raw.to_string()
                }),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_parse_score_too_large() {
        assert!(matches!(
            parse_score("home", "4294967296"),
            Err(ScoringError::InvalidScore { .. })
        ));
    }

    #[test]
    fn test_parse_score_empty_is_missing() {
        assert_eq!(
            parse_score("away", ""),
            Err(ScoringError::MissingField { field: "away" })
        );
    }

    #[test]
    fn test_parse_score_non_numeric() {
        let err = parse_score("home", "two").unwrap_err();
        assert_eq!(
            err,
            ScoringError::InvalidScore {
                field: "home",
                value: "two".to_string()
            }
        );
        assert!(err.to_string().contains("home"));
    }

    #[test]
    fn test_parse_score_negative_rejected() {
        assert!(matches!(
            parse_score("away", "-1"),
            Err(ScoringError::InvalidScore { field: "away", .. })
        ));
    }

    #[test]
    fn test_parse_score_decimal_rejected() {
        assert!(parse_score("home", "1.5").is_err());
    }

    #[test]
    fn test_require_pick_keeps_whitespace() {
        assert_eq!(
            require_pick("champion", " Real Madrid "),
            Ok(" Real Madrid ".to_string())
        );
    }

    #[test]
    fn test_require_pick_blank_is_missing() {
        assert_eq!(
            require_pick("mvp", "   "),
            Err(ScoringError::MissingField { field: "mvp" })
        );
    }

    #[test]
    fn test_match_score_parse_names_field() {
        let err = MatchScore::parse("2", "x").unwrap_err();
        assert!(err.to_string().starts_with("away"));
        assert_eq!(MatchScore::parse("2", "1"), Ok(MatchScore::new(2, 1)));
    }

    #[test]
    fn test_league_picks_parse_missing_field() {
        let err = LeaguePicks::parse("Real Madrid", "X", "", "Z").unwrap_err();
        assert_eq!(err, ScoringError::MissingField { field: "top_assist" });
    }

    #[test]
    fn test_award_pick_parse() {
        assert_eq!(AwardPick::parse("Rodri").unwrap().winner, "Rodri");
        assert!(AwardPick::parse("").is_err());
    }

    #[test]
    fn test_valid_rules() {
        assert!(validate_rules(&ScoringRules::default()).is_ok());
    }

    #[test]
    fn test_zero_correct_result() {
        let rules = ScoringRules {
            correct_result: 0,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("scoring.correct_result"));
    }

    #[test]
    fn test_exact_below_correct_result() {
        let rules = ScoringRules {
            exact_score: 2,
            correct_result: 3,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.exact_score"));
    }

    #[test]
    fn test_collects_all_errors() {
        let rules = ScoringRules {
            exact_score: 5,
            correct_result: 3,
            league_pick: 0,  // Error 1
            award_winner: 0, // Error 2
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_league_pick_too_large() {
        let rules = ScoringRules {
            league_pick: 1_500_000_000,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.league_pick"));

        let at_limit = ScoringRules {
            league_pick: MAX_LEAGUE_PICK,
            ..ScoringRules::default()
        };
        assert!(validate_rules(&at_limit).is_ok());
        assert!(MAX_LEAGUE_PICK.checked_mul(LEAGUE_FIELDS).is_some());
    }

    #[test]
    fn test_check_picks_rejects_blank_names() {
        let league = Outcome::League(LeaguePicks {
            champion: String::new(),
            top_scorer: "X".to_string(),
            top_assist: "Y".to_string(),
            mvp: "Z".to_string(),
        });
        assert_eq!(
            league.check_picks(),
            Err(ScoringError::MissingField { field: "champion" })
        );

        let award = Outcome::Award(AwardPick {
            winner: " ".to_string(),
        });
        assert!(award.check_picks().is_err());

        assert!(Outcome::Match(MatchScore::new(0, 0)).check_picks().is_ok());
        assert!(Outcome::Award(AwardPick {
            winner: "Rodri".to_string()
        })
        .check_picks()
        .is_ok());
    }
}
