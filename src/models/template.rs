use crate::error::StorageError;
use std::fmt;
use std::str::FromStr;

/// Dashboard layout variant. Selects which panels are shown, never how the
/// numbers behind them are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTemplate {
    #[default]
    Default,
    Minimal,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    SummaryCards,
    CategoryBreakdown,
    MonthlyTrend,
    RecentActivity,
    AllTransactions,
}

impl DashboardTemplate {
    pub const ALL: [DashboardTemplate; 3] = [
        DashboardTemplate::Default,
        DashboardTemplate::Minimal,
        DashboardTemplate::Detailed,
    ];

    pub fn id(self) -> &'static str {
        match self {
            DashboardTemplate::Default => "default",
            DashboardTemplate::Minimal => "minimal",
            DashboardTemplate::Detailed => "detailed",
        }
    }

    pub fn panels(self) -> &'static [Panel] {
        match self {
            DashboardTemplate::Minimal => &[Panel::SummaryCards],
            DashboardTemplate::Default => &[
                Panel::SummaryCards,
                Panel::CategoryBreakdown,
                Panel::RecentActivity,
            ],
            DashboardTemplate::Detailed => &[
                Panel::SummaryCards,
                Panel::CategoryBreakdown,
                Panel::MonthlyTrend,
                Panel::AllTransactions,
            ],
        }
    }

    pub fn shows(self, panel: Panel) -> bool {
        self.panels().contains(&panel)
    }
}

impl fmt::Display for DashboardTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DashboardTemplate {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(DashboardTemplate::Default),
            "minimal" => Ok(DashboardTemplate::Minimal),
            "detailed" => Ok(DashboardTemplate::Detailed),
            _ => Err(StorageError::UnknownTemplate(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_ids() {
        for template in DashboardTemplate::ALL {
            assert_eq!(template.id().parse::<DashboardTemplate>().unwrap(), template);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            " Detailed ".parse::<DashboardTemplate>().unwrap(),
            DashboardTemplate::Detailed
        );
    }

    #[test]
    fn test_parse_unknown_template() {
        let result = "fancy".parse::<DashboardTemplate>();
        assert!(matches!(result, Err(StorageError::UnknownTemplate(ref s)) if s == "fancy"));
    }

    #[test]
    fn test_minimal_only_shows_cards() {
        assert_eq!(DashboardTemplate::Minimal.panels(), &[Panel::SummaryCards]);
        assert!(!DashboardTemplate::Minimal.shows(Panel::CategoryBreakdown));
    }

    #[test]
    fn test_every_template_shows_cards() {
        for template in DashboardTemplate::ALL {
            assert!(template.shows(Panel::SummaryCards));
        }
    }

    #[test]
    fn test_detailed_shows_monthly_trend() {
        assert!(DashboardTemplate::Detailed.shows(Panel::MonthlyTrend));
        assert!(!DashboardTemplate::Default.shows(Panel::MonthlyTrend));
    }
}
