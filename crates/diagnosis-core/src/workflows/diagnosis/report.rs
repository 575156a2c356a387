use super::domain::{Session, SessionSnapshot};
use super::scoring::{DetailedRoi, RecommendedAvatar, ScoringModel, TotalScore};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    #[serde(flatten)]
    pub recommendation: RecommendedAvatar,
    pub detailed_roi: DetailedRoi,
}

/// Plain-data bundle consumed by narrative and UI layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisReport {
    pub session: SessionSnapshot,
    pub completed: bool,
    pub total_score: TotalScore,
    pub recommendations: Vec<RecommendationView>,
}

impl DiagnosisReport {
    pub fn build(scoring: &ScoringModel, session: &Session) -> Self {
        let total_score = scoring.calculate_total_score(session);
        let recommendations = scoring
            .determine_recommended_avatars(&total_score)
            .into_iter()
            .map(|recommendation| {
                let detailed_roi = scoring.calculate_detailed_roi(&recommendation, session);
                RecommendationView {
                    recommendation,
                    detailed_roi,
                }
            })
            .collect();

        Self {
            session: session.snapshot(),
            completed: session.is_completed(),
            total_score,
            recommendations,
        }
    }

    /// One-line headline for logs and terminal output.
    pub fn headline(&self) -> String {
        match &self.total_score.top_priority_axis {
            Some(axis) => format!(
                "overall {:.1} | top priority: {} | {} recommendation(s)",
                self.total_score.overall,
                axis,
                self.recommendations.len()
            ),
            None => format!("overall {:.1} | no scored axes", self.total_score.overall),
        }
    }
}
