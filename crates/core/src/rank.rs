use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankError {
    #[error("max score must be > 0")]
    ZeroMaxScore,

    #[error("score {score} exceeds max score {max_score}")]
    ScoreAboveMax { score: u32, max_score: u32 },

    #[error("threshold fraction {numerator}/{denominator} must be in (0, 1]")]
    InvalidFraction { numerator: u32, denominator: u32 },

    #[error("rookie cutoff must be strictly below the enthusiast cutoff")]
    UnorderedCutoffs,
}

//
// ─── RANK NAMES ────────────────────────────────────────────────────────────────
//

/// Named tier assigned from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankName {
    Rookie,
    Enthusiast,
    Master,
}

impl RankName {
    /// Display title shown on the results screen.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            RankName::Rookie => "Wig Rookie",
            RankName::Enthusiast => "Wig Enthusiast",
            RankName::Master => "Lace Master",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            RankName::Rookie => "\u{1f331}",
            RankName::Enthusiast => "\u{1f49c}",
            RankName::Master => "\u{1f451}",
        }
    }

    /// Encouragement line paired with the tier on the results screen.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            RankName::Rookie => {
                "You're just getting started! Keep learning about wigs and you'll be a pro in no time."
            }
            RankName::Enthusiast => {
                "Great job! You have a solid understanding of wig care and styling. Keep it up!"
            }
            RankName::Master => {
                "Outstanding! You're a true wig expert. Your knowledge is impressive!"
            }
        }
    }
}

impl fmt::Display for RankName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

//
// ─── THRESHOLDS ────────────────────────────────────────────────────────────────
//

/// Tier cutoffs expressed as exact fractions of the maximum score.
///
/// A score `s` is in or below a cutoff `num/den` iff `s * den <= num * max`.
/// Integer arithmetic keeps boundary scores in the lower tier for every bank
/// size; absolute per-bank cutoffs are deliberately not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankThresholds {
    rookie_num: u32,
    rookie_den: u32,
    enthusiast_num: u32,
    enthusiast_den: u32,
}

impl RankThresholds {
    /// Cutoffs at one third and two thirds of the maximum score.
    #[must_use]
    pub fn thirds() -> Self {
        Self {
            rookie_num: 1,
            rookie_den: 3,
            enthusiast_num: 2,
            enthusiast_den: 3,
        }
    }

    /// Creates custom cutoffs from `(numerator, denominator)` fractions.
    ///
    /// # Errors
    ///
    /// Returns `RankError::InvalidFraction` unless both fractions are in
    /// `(0, 1]`, and `RankError::UnorderedCutoffs` unless the rookie cutoff
    /// is strictly below the enthusiast cutoff.
    pub fn new(rookie: (u32, u32), enthusiast: (u32, u32)) -> Result<Self, RankError> {
        for (numerator, denominator) in [rookie, enthusiast] {
            if denominator == 0 || numerator == 0 || numerator > denominator {
                return Err(RankError::InvalidFraction {
                    numerator,
                    denominator,
                });
            }
        }
        // Cross-multiplied strict ordering: r_num/r_den < e_num/e_den.
        if u64::from(rookie.0) * u64::from(enthusiast.1)
            >= u64::from(enthusiast.0) * u64::from(rookie.1)
        {
            return Err(RankError::UnorderedCutoffs);
        }

        Ok(Self {
            rookie_num: rookie.0,
            rookie_den: rookie.1,
            enthusiast_num: enthusiast.0,
            enthusiast_den: enthusiast.1,
        })
    }

    /// Highest score still inside the rookie tier for the given max.
    #[must_use]
    pub fn rookie_upper_bound(&self, max_score: u32) -> u32 {
        upper_bound(self.rookie_num, self.rookie_den, max_score)
    }

    /// Highest score still inside the enthusiast tier for the given max.
    #[must_use]
    pub fn enthusiast_upper_bound(&self, max_score: u32) -> u32 {
        upper_bound(self.enthusiast_num, self.enthusiast_den, max_score)
    }
}

impl Default for RankThresholds {
    fn default() -> Self {
        Self::thirds()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn upper_bound(numerator: u32, denominator: u32, max_score: u32) -> u32 {
    // floor(num * max / den); num <= den keeps the result within u32.
    (u64::from(numerator) * u64::from(max_score) / u64::from(denominator)) as u32
}

//
// ─── RANK TIERS ────────────────────────────────────────────────────────────────
//

/// A tier with its absolute score range for a given maximum score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankTier {
    pub name: RankName,
    pub lower_bound: u32,
    pub upper_bound: u32,
    pub message: &'static str,
}

/// All three tiers with their score ranges for the given maximum score.
///
/// # Errors
///
/// Returns `RankError::ZeroMaxScore` for an empty score range.
pub fn tiers(max_score: u32, thresholds: &RankThresholds) -> Result<[RankTier; 3], RankError> {
    if max_score == 0 {
        return Err(RankError::ZeroMaxScore);
    }

    let rookie_hi = thresholds.rookie_upper_bound(max_score);
    let enthusiast_hi = thresholds.enthusiast_upper_bound(max_score);

    Ok([
        RankTier {
            name: RankName::Rookie,
            lower_bound: 0,
            upper_bound: rookie_hi,
            message: RankName::Rookie.message(),
        },
        RankTier {
            name: RankName::Enthusiast,
            lower_bound: rookie_hi + 1,
            upper_bound: enthusiast_hi,
            message: RankName::Enthusiast.message(),
        },
        RankTier {
            name: RankName::Master,
            lower_bound: enthusiast_hi + 1,
            upper_bound: max_score,
            message: RankName::Master.message(),
        },
    ])
}

/// Computes the tier for a final score.
///
/// Boundary scores belong to the lower tier: with cutoffs at thirds and a
/// 48-question bank, 16 is still a rookie and 32 still an enthusiast.
///
/// # Errors
///
/// Returns `RankError::ZeroMaxScore` or `RankError::ScoreAboveMax` for
/// impossible inputs.
pub fn compute_rank(
    score: u32,
    max_score: u32,
    thresholds: &RankThresholds,
) -> Result<RankTier, RankError> {
    if max_score == 0 {
        return Err(RankError::ZeroMaxScore);
    }
    if score > max_score {
        return Err(RankError::ScoreAboveMax { score, max_score });
    }

    let all = tiers(max_score, thresholds)?;
    let tier = all
        .into_iter()
        .find(|tier| score >= tier.lower_bound && score <= tier.upper_bound)
        .unwrap_or(all[2]);
    Ok(tier)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
