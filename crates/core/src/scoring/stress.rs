//! Environmental-stress penalty.
//!
//! The stress signal is a secondary enrichment. Anything wrong with it
//! resolves to "no penalty" and the score is still produced.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::consultation::{EnvStressOutput, ESS_SCHEMA_V1};
use crate::numeric::clamp100;

/// Upper bound on points removed from a 0..100 total.
pub const MAX_STRESS_PENALTY: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressRejection {
    SchemaMismatch,
    MissingEss,
    NonFiniteEss,
}

impl StressRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaMismatch => "schema_mismatch",
            Self::MissingEss => "missing_ess",
            Self::NonFiniteEss => "non_finite_ess",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StressAssessment {
    /// ESS after clamping to `[0, 100]`, when the input was usable.
    pub ess: Option<f64>,
    pub penalty: f64,
    pub rejection: Option<StressRejection>,
}

impl StressAssessment {
    const ABSENT: Self = Self { ess: None, penalty: 0.0, rejection: None };

    fn rejected(rejection: StressRejection) -> Self {
        Self { ess: None, penalty: 0.0, rejection: Some(rejection) }
    }
}

pub fn assess_stress(env_stress: Option<&EnvStressOutput>) -> StressAssessment {
    let Some(output) = env_stress else {
        return StressAssessment::ABSENT;
    };

    if output.schema != ESS_SCHEMA_V1 {
        return log_rejection(StressAssessment::rejected(StressRejection::SchemaMismatch));
    }

    let ess = match output.ess {
        None => return log_rejection(StressAssessment::rejected(StressRejection::MissingEss)),
        Some(ess) if !ess.is_finite() => {
            return log_rejection(StressAssessment::rejected(StressRejection::NonFiniteEss))
        }
        Some(ess) => clamp100(ess),
    };

    StressAssessment { ess: Some(ess), penalty: ess / 100.0 * MAX_STRESS_PENALTY, rejection: None }
}

/// Points to subtract from a non-vetoed total, always within `[0, 10]`.
pub fn stress_penalty(env_stress: Option<&EnvStressOutput>) -> f64 {
    assess_stress(env_stress).penalty
}

fn log_rejection(assessment: StressAssessment) -> StressAssessment {
    if let Some(rejection) = assessment.rejection {
        debug!(
            event_name = "engine.stress.rejected",
            reason = rejection.as_str(),
            "environmental stress input ignored"
        );
    }
    assessment
}

/// Outcome of asking the environmental provider for a stress summary.
#[derive(Clone, Debug, PartialEq)]
pub enum StressLookup {
    Present(EnvStressOutput),
    Absent,
    Failed(String),
}

impl StressLookup {
    /// Runs a fallible accessor and captures its failure instead of
    /// propagating it.
    pub fn from_accessor<F, E>(accessor: F) -> Self
    where
        F: FnOnce() -> Result<Option<EnvStressOutput>, E>,
        E: fmt::Display,
    {
        match accessor() {
            Ok(Some(output)) => Self::Present(output),
            Ok(None) => Self::Absent,
            Err(error) => Self::Failed(error.to_string()),
        }
    }

    pub fn into_option(self) -> Option<EnvStressOutput> {
        match self {
            Self::Present(output) => Some(output),
            Self::Absent => None,
            Self::Failed(message) => {
                warn!(
                    event_name = "engine.stress.lookup_failed",
                    error = %message,
                    "environmental stress lookup failed; scoring without it"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{assess_stress, stress_penalty, StressLookup, StressRejection};
    use crate::domain::consultation::{EnvStressOutput, StressTier};

    #[test]
    fn penalty_is_linear_bounded_and_monotonic() {
        let mut previous = -1.0;
        for ess in [0.0, 10.0, 25.0, 50.0, 75.0, 100.0] {
            let penalty = stress_penalty(Some(&EnvStressOutput::v1(ess, StressTier::Moderate)));
            assert!((0.0..=10.0).contains(&penalty));
            assert!(penalty >= previous);
            assert!((penalty - ess / 10.0).abs() < 1e-9);
            previous = penalty;
        }
    }

    #[test]
    fn finite_out_of_range_ess_is_clamped_not_rejected() {
        let high = assess_stress(Some(&EnvStressOutput::v1(180.0, StressTier::Severe)));
        assert_eq!(high.penalty, 10.0);
        assert_eq!(high.ess, Some(100.0));

        let low = assess_stress(Some(&EnvStressOutput::v1(-20.0, StressTier::Low)));
        assert_eq!(low.penalty, 0.0);
        assert_eq!(low.rejection, None);
    }

    #[test]
    fn non_finite_ess_is_treated_as_absent() {
        for ess in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let assessment = assess_stress(Some(&EnvStressOutput::v1(ess, StressTier::High)));
            assert_eq!(assessment.penalty, 0.0);
            assert_eq!(assessment.rejection, Some(StressRejection::NonFiniteEss));
        }
    }

    #[test]
    fn wrong_schema_and_missing_ess_are_rejected() {
        let mut output = EnvStressOutput::v1(80.0, StressTier::High);
        output.schema = "weather.v0".to_owned();
        assert_eq!(assess_stress(Some(&output)).rejection, Some(StressRejection::SchemaMismatch));

        let mut output = EnvStressOutput::v1(80.0, StressTier::High);
        output.ess = None;
        assert_eq!(assess_stress(Some(&output)).rejection, Some(StressRejection::MissingEss));
        assert_eq!(stress_penalty(None), 0.0);
    }

    #[test]
    fn schema_tag_must_match_exactly() {
        for schema in [" aurora.ess.v1", "aurora.ess.v1 ", "AURORA.ESS.V1", "aurora.ess.v1\n"] {
            let mut output = EnvStressOutput::v1(80.0, StressTier::High);
            output.schema = schema.to_owned();
            let assessment = assess_stress(Some(&output));
            assert_eq!(assessment.rejection, Some(StressRejection::SchemaMismatch), "{schema:?}");
            assert_eq!(assessment.penalty, 0.0);
        }

        let exact = assess_stress(Some(&EnvStressOutput::v1(80.0, StressTier::High)));
        assert_eq!(exact.rejection, None);
        assert!((exact.penalty - 8.0).abs() < 1e-9);
    }

    #[test]
    fn failing_accessor_resolves_to_absent() {
        let lookup =
            StressLookup::from_accessor(|| -> Result<Option<EnvStressOutput>, String> {
                Err("weather provider timed out".to_owned())
            });

        assert!(matches!(lookup, StressLookup::Failed(ref message) if message.contains("timed out")));
        assert_eq!(lookup.into_option(), None);

        let present = StressLookup::from_accessor(|| -> Result<_, String> {
            Ok(Some(EnvStressOutput::v1(40.0, StressTier::Moderate)))
        });
        assert!(present.into_option().is_some());
    }
}
