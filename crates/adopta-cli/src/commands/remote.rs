//! Commands against a running Adopta server

use anyhow::{Context, Result};
use tracing::debug;

use adopta_core::insights::ExecutiveSummary;

use super::{print_flags, print_header, print_metrics, print_report, print_scan};
use crate::cli::RemoteAction;
use crate::client::ApiClient;

pub async fn cmd_remote(url: &str, token: Option<&str>, action: RemoteAction) -> Result<()> {
    let mut client = ApiClient::new(url, None)?;
    if let Some(token) = token {
        client.set_token(token);
    }

    let result = run_action(&mut client, url, action).await;

    debug!(cached = client.cache().len(), "Remote session finished");
    client.logout();
    result
}

async fn run_action(client: &mut ApiClient, url: &str, action: RemoteAction) -> Result<()> {
    match action {
        RemoteAction::Health => {
            let health = client
                .system_health()
                .await
                .with_context(|| format!("Failed to fetch system health from {}", url))?;
            print_header("🩺 System Health");
            print_report(&health.analysis);
        }
        RemoteAction::Recommendations => {
            let recommendations = client
                .adoption_recommendations()
                .await
                .with_context(|| format!("Failed to fetch recommendations from {}", url))?;
            print_header("💡 Adoption Recommendations");
            print_metrics(&recommendations.data_analyzed);
            println!();
            print_report(&recommendations.recommendations);
        }
        RemoteAction::Anomalies => {
            let anomalies = client
                .detect_anomalies()
                .await
                .with_context(|| format!("Failed to fetch anomalies from {}", url))?;
            print_header("🚨 Anomaly Detection");
            if let Some(flags) = &anomalies.anomalies.flags {
                print_flags(flags);
            }
            print_scan(&anomalies.data_checked);
            println!();
            print_report(&anomalies.anomalies);
        }
        RemoteAction::Chat { message, context } => {
            let reply = client
                .chat(&message, context.as_deref())
                .await
                .with_context(|| format!("Chat request to {} failed", url))?;
            println!("💬 {}", message);
            println!();
            println!("{}", reply.response.response);
            println!();
            println!("   Source: {}", reply.response.source);
        }
        RemoteAction::Summary => {
            let analysis = client.complete_analysis().await;
            let summary =
                ExecutiveSummary::build(analysis.health.as_ref(), analysis.anomalies.as_ref());

            print_header("📋 Executive Summary");
            println!("   Status: {}", summary.status.as_str().to_uppercase());
            if summary.critical_issues.is_empty() {
                println!("   ✅ No critical issues");
            }
            for issue in &summary.critical_issues {
                println!("   ⚠️  {}", issue);
            }

            let metrics = &summary.metrics;
            println!();
            println!(
                "   🐾 Pets: {} ({} available)",
                metrics.total_pets, metrics.available_pets
            );
            println!(
                "   🏠 Adoptions: {} ({} pending)",
                metrics.total_adoptions, metrics.pending_adoptions
            );
            println!("   💰 Donations: {}", metrics.total_donations);
            println!("   👥 Users: {}", metrics.total_users);

            let missing: Vec<&str> = [
                ("health", analysis.health.is_none()),
                ("recommendations", analysis.recommendations.is_none()),
                ("anomalies", analysis.anomalies.is_none()),
            ]
            .iter()
            .filter(|(_, failed)| *failed)
            .map(|(name, _)| *name)
            .collect();
            if !missing.is_empty() {
                println!();
                println!("   ❌ Unavailable: {}", missing.join(", "));
            }
        }
    }

    Ok(())
}
