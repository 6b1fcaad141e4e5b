//! Executive summary over the three analyses

use serde::{Deserialize, Serialize};

use super::types::{AnomaliesResponse, SystemHealthResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Healthy,
    Warning,
    Critical,
}

impl SummaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStatus::Healthy => "healthy",
            SummaryStatus::Warning => "warning",
            SummaryStatus::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_pets: i64,
    pub available_pets: i64,
    pub total_adoptions: i64,
    pub pending_adoptions: i64,
    pub total_donations: i64,
    pub total_users: i64,
}

/// One-glance status for dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub status: SummaryStatus,
    pub critical_issues: Vec<String>,
    pub metrics: SummaryMetrics,
}

impl ExecutiveSummary {
    /// Build from whichever analyses could be fetched
    pub fn build(
        health: Option<&SystemHealthResponse>,
        anomalies: Option<&AnomaliesResponse>,
    ) -> Self {
        let mut status = SummaryStatus::Healthy;
        let mut critical_issues = Vec::new();
        let mut metrics = SummaryMetrics::default();

        if let Some(health) = health {
            let data = &health.system_data;
            metrics = SummaryMetrics {
                total_pets: data.pets.total,
                available_pets: data.pets.available,
                total_adoptions: data.adoptions.total,
                pending_adoptions: data.adoptions.pending,
                total_donations: data.donations.total,
                total_users: data.users.total,
            };

            if data.pets.available == 0 {
                critical_issues.push("No hay mascotas disponibles para adopción".to_string());
                status = SummaryStatus::Warning;
            }
            if data.adoptions.pending > data.adoptions.approved {
                critical_issues.push("Hay más adopciones pendientes que aprobadas".to_string());
                status = SummaryStatus::Warning;
            }
        }

        let flagged = anomalies
            .and_then(|a| a.anomalies.flags.as_ref())
            .is_some_and(|flags| !flags.is_empty());
        if flagged {
            critical_issues.push("Se detectaron anomalías en el sistema".to_string());
            status = SummaryStatus::Critical;
        }

        Self {
            status,
            critical_issues,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::snapshot::SystemSnapshot;
    use crate::insights::types::{AnalysisReport, AnalysisSource, AnomalyFlag, AnomalyKind};
    use chrono::Utc;

    fn report(flags: Option<Vec<AnomalyFlag>>) -> AnalysisReport {
        AnalysisReport {
            analysis: String::new(),
            source: AnalysisSource::Simulated,
            timestamp: Utc::now(),
            usage: None,
            flags,
        }
    }

    fn health(snapshot: SystemSnapshot) -> SystemHealthResponse {
        SystemHealthResponse {
            status: "success".into(),
            analysis: report(None),
            system_data: snapshot,
            timestamp: Utc::now(),
        }
    }

    fn anomalies(flags: Vec<AnomalyFlag>) -> AnomaliesResponse {
        AnomaliesResponse {
            status: "success".into(),
            anomalies: report(Some(flags)),
            data_checked: Default::default(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_healthy() {
        let mut s = SystemSnapshot::default();
        s.pets.total = 4;
        s.pets.available = 2;
        s.adoptions.pending = 1;
        s.adoptions.approved = 1;

        let summary = ExecutiveSummary::build(Some(&health(s)), Some(&anomalies(vec![])));
        assert_eq!(summary.status, SummaryStatus::Healthy);
        assert!(summary.critical_issues.is_empty());
        assert_eq!(summary.metrics.total_pets, 4);
    }

    #[test]
    fn test_warnings() {
        let mut s = SystemSnapshot::default();
        s.adoptions.pending = 3;
        s.adoptions.approved = 1;

        let summary = ExecutiveSummary::build(Some(&health(s)), None);
        assert_eq!(summary.status, SummaryStatus::Warning);
        assert_eq!(summary.critical_issues.len(), 2);
    }

    #[test]
    fn test_anomalies_are_critical() {
        let flag = AnomalyFlag {
            kind: AnomalyKind::DonationSpike,
            evidence: 30.0,
        };
        let summary = ExecutiveSummary::build(None, Some(&anomalies(vec![flag])));
        assert_eq!(summary.status, SummaryStatus::Critical);
        assert_eq!(summary.metrics, SummaryMetrics::default());
    }
}
