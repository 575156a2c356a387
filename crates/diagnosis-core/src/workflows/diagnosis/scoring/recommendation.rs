use super::super::blueprint::COMPANY_SIZE_QUESTION;
use super::super::domain::{Axis, Session};
use super::round_to_tenth;
use serde::{Deserialize, Serialize};

pub const EMPLOYEE_COUNT_METADATA_KEY: &str = "employee_count";
const DEFAULT_EMPLOYEE_COUNT: f64 = 30.0;
const FALLBACK_PAYBACK_MONTHS: u32 = 12;

/// Specialist persona a client can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvatarType {
    StrategyAdvisor,
    SalesAccelerator,
    OrganizationArchitect,
    MarketingNavigator,
}

impl AvatarType {
    pub fn for_axis(axis: &Axis) -> Option<Self> {
        match axis.as_str() {
            Axis::MANAGEMENT => Some(Self::StrategyAdvisor),
            Axis::SALES => Some(Self::SalesAccelerator),
            Axis::ORGANIZATION => Some(Self::OrganizationArchitect),
            Axis::MARKETING => Some(Self::MarketingNavigator),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StrategyAdvisor => "Strategy Advisor",
            Self::SalesAccelerator => "Sales Accelerator",
            Self::OrganizationArchitect => "Organization Architect",
            Self::MarketingNavigator => "Marketing Navigator",
        }
    }

    pub fn expected_benefits(self) -> &'static [&'static str] {
        match self {
            Self::StrategyAdvisor => &[
                "A written mid-term plan with quarterly milestones",
                "Faster, better documented leadership decisions",
                "Vision shared consistently across the team",
            ],
            Self::SalesAccelerator => &[
                "A tracked pipeline with stage conversion rates",
                "Shorter sales cycles through follow-up discipline",
                "Predictable monthly revenue forecasts",
            ],
            Self::OrganizationArchitect => &[
                "Clear roles and decision rights",
                "Lower turnover through structured onboarding",
                "A repeatable review and training rhythm",
            ],
            Self::MarketingNavigator => &[
                "Channel mix focused on the best converting sources",
                "Consistent brand message in the target market",
                "Measurable cost per acquired customer",
            ],
        }
    }

    pub const fn estimated_roi(self) -> &'static str {
        match self {
            Self::StrategyAdvisor => "10-20% profit improvement within 12 months",
            Self::SalesAccelerator => "15-25% revenue growth within 6 months",
            Self::OrganizationArchitect => "20-30% lower turnover within 12 months",
            Self::MarketingNavigator => "2x qualified leads within 6 months",
        }
    }

    /// Monthly return per employee.
    pub(crate) const fn per_employee_rate(self) -> f64 {
        match self {
            Self::StrategyAdvisor => 120.0,
            Self::SalesAccelerator => 150.0,
            Self::OrganizationArchitect => 100.0,
            Self::MarketingNavigator => 130.0,
        }
    }

    pub(crate) const fn initial_cost(self) -> f64 {
        match self {
            Self::StrategyAdvisor => 3_000.0,
            Self::SalesAccelerator => 2_500.0,
            Self::OrganizationArchitect => 2_000.0,
            Self::MarketingNavigator => 2_800.0,
        }
    }

    pub(crate) const fn monthly_cost(self) -> f64 {
        match self {
            Self::StrategyAdvisor => 500.0,
            Self::SalesAccelerator => 450.0,
            Self::OrganizationArchitect => 400.0,
            Self::MarketingNavigator => 450.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedAvatar {
    pub avatar: AvatarType,
    pub name: String,
    pub axis: Axis,
    pub match_score: f64,
    pub expected_benefits: Vec<String>,
    pub estimated_roi: String,
}

impl RecommendedAvatar {
    pub(crate) fn new(avatar: AvatarType, axis: Axis, match_score: f64) -> Self {
        Self {
            avatar,
            name: avatar.label().to_string(),
            axis,
            match_score,
            expected_benefits: avatar
                .expected_benefits()
                .iter()
                .map(|benefit| benefit.to_string())
                .collect(),
            estimated_roi: avatar.estimated_roi().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRoi {
    pub employee_count: f64,
    pub monthly_roi: f64,
    pub yearly_roi: f64,
    pub payback_months: u32,
}

impl DetailedRoi {
    pub fn estimate(avatar: AvatarType, employee_count: f64) -> Self {
        let monthly_roi = employee_count * avatar.per_employee_rate();
        let net_monthly = monthly_roi - avatar.monthly_cost();
        let payback_months = if net_monthly > 0.0 {
            (avatar.initial_cost() / net_monthly).ceil() as u32
        } else {
            FALLBACK_PAYBACK_MONTHS
        };

        Self {
            employee_count,
            monthly_roi,
            yearly_roi: monthly_roi * 12.0,
            payback_months,
        }
    }
}

/// Urgency of the axis weighted against the overall health of the business.
pub(crate) fn match_score(axis_score: f64, overall: f64) -> f64 {
    round_to_tenth(0.7 * (100.0 - axis_score) + 0.3 * (100.0 - overall))
}

/// Employee count from session metadata, falling back to the company size answer.
pub(crate) fn employee_count_for(session: &Session) -> f64 {
    let declared = session
        .metadata()
        .get(EMPLOYEE_COUNT_METADATA_KEY)
        .map(String::as_str)
        .or_else(|| {
            session
                .answers()
                .iter()
                .rev()
                .find(|answer| answer.question_id == COMPANY_SIZE_QUESTION && !answer.skipped)
                .and_then(|answer| answer.value.as_text())
        });

    declared
        .and_then(parse_employee_range)
        .unwrap_or(DEFAULT_EMPLOYEE_COUNT)
}

/// Midpoint of a "min-max" range such as "11-50".
///
/// Bounds may be written in either order. Anything else, such as "200+", is `None`.
pub fn parse_employee_range(value: &str) -> Option<f64> {
    let (low, high) = value.split_once('-')?;
    let low: f64 = low.trim().parse().ok()?;
    let high: f64 = high.trim().parse().ok()?;
    Some((low + high) / 2.0)
}
