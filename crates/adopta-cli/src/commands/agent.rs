//! Insight engine commands, run against the local database

use anyhow::{bail, Context, Result};

use adopta_core::insights::format::{money, percent, round1};
use adopta_core::models::{AdoptionMetrics, AnomalyScan};
use adopta_core::{AnalysisReport, AnomalyFlag, AnomalyKind, Database, InsightEngine};

use super::print_header;

pub async fn cmd_health(db: &Database, engine: &InsightEngine) -> Result<()> {
    let snapshot = db.collect_snapshot().context("Failed to collect snapshot")?;
    let report = engine.system_health(&snapshot).await;

    print_header("🩺 System Health");
    print_report(&report);
    Ok(())
}

pub async fn cmd_recommendations(db: &Database, engine: &InsightEngine) -> Result<()> {
    let snapshot = db.collect_snapshot().context("Failed to collect snapshot")?;
    let metrics = db
        .adoption_metrics()
        .context("Failed to compute adoption metrics")?;
    let report = engine.adoption_recommendations(&snapshot, &metrics).await;

    print_header("💡 Adoption Recommendations");
    print_metrics(&metrics);
    println!();
    print_report(&report);
    Ok(())
}

pub async fn cmd_anomalies(db: &Database, engine: &InsightEngine) -> Result<()> {
    let snapshot = db.collect_snapshot().context("Failed to collect snapshot")?;
    let scan = db.anomaly_scan().context("Failed to scan for anomalies")?;
    let report = engine.detect_anomalies(&snapshot, &scan).await;

    print_header("🚨 Anomaly Detection");
    if let Some(flags) = &report.flags {
        print_flags(flags);
    }
    print_scan(&scan);
    println!();
    print_report(&report);
    Ok(())
}

pub async fn cmd_chat(
    db: &Database,
    engine: &InsightEngine,
    message: &str,
    context: Option<&str>,
    max_chars: usize,
) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message must not be empty");
    }
    let chars = message.chars().count();
    if chars > max_chars {
        bail!(
            "Message is {} characters, at most {} are allowed",
            chars,
            max_chars
        );
    }

    let snapshot = db.collect_snapshot().context("Failed to collect snapshot")?;
    let reply = engine.chat(message, context, &snapshot).await;

    println!("💬 {}", message);
    println!();
    println!("{}", reply.response);
    println!();
    println!("   Source: {}", reply.source);
    Ok(())
}

/// Analysis text followed by its provenance
pub fn print_report(report: &AnalysisReport) {
    println!("{}", report.analysis);
    println!();
    print!("   Source: {}", report.source);
    if let Some(usage) = &report.usage {
        print!(" ({} tokens)", usage.total_tokens);
    }
    println!();
}

pub fn print_flags(flags: &[AnomalyFlag]) {
    if flags.is_empty() {
        println!("   ✅ No thresholds crossed");
        return;
    }
    for flag in flags {
        let detail = match flag.kind {
            AnomalyKind::PendingAdoptionsSpike => {
                format!(
                    "{}% of adoptions pending",
                    percent(round1(flag.evidence * 100.0))
                )
            }
            AnomalyKind::DonationSpike => format!("{} donations this week", flag.evidence),
            AnomalyKind::UserRegistrationSpike => {
                format!("{} registrations this week", flag.evidence)
            }
        };
        println!("   ⚠️  {}: {}", flag.kind.as_str(), detail);
    }
}

pub fn print_metrics(metrics: &AdoptionMetrics) {
    println!(
        "   Success rate: {}%",
        percent(round1(metrics.adoption_success_rate))
    );
    println!(
        "   Average time to adopt: {:.1} days",
        metrics.average_adoption_time
    );
    for popular in &metrics.popular_pet_characteristics {
        println!(
            "   🏆 {} / {} / {}: {} adopted",
            popular.species,
            popular.breed.as_deref().unwrap_or("-"),
            popular.size,
            popular.adopted_count
        );
    }
}

pub fn print_scan(scan: &AnomalyScan) {
    for day in &scan.unusual_adoption_patterns {
        println!("   📈 {}: {} adoption requests", day.date, day.count);
    }
    for donation in &scan.donation_anomalies {
        println!(
            "   💸 Donation #{}: ${} on {}",
            donation.id,
            money(donation.amount),
            donation.created_at.format("%Y-%m-%d")
        );
    }
    for user in &scan.user_behavior_anomalies {
        println!(
            "   👤 {}: {} adoptions, {} donations",
            user.name, user.adoptions_count, user.donations_count
        );
    }
}
