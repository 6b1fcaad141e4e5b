//! Snapshot classifier: health tier plus narrative
//!
//! Pure text construction. The narrative carries no timestamp, so the same
//! snapshot always renders byte-identical output.

use std::fmt::Write;

use super::format::{money, percent};
use super::snapshot::SystemSnapshot;
use super::types::{HealthAssessment, Tier};

/// Adoption rate above which the system is excellent
pub const EXCELLENT_ADOPTION_RATE: f64 = 70.0;
/// Adoption rate above which the system is good
pub const GOOD_ADOPTION_RATE: f64 = 50.0;
/// Pending requests above which the adoptions block raises an alert
pub const PENDING_ALERT: i64 = 10;
/// Pending requests above which reviews should be sped up
pub const PENDING_REVIEW: i64 = 5;
/// Donation total above which donations are excellent
pub const EXCELLENT_DONATIONS: f64 = 1000.0;
/// Donation total below which campaigns are recommended
pub const LOW_DONATIONS: f64 = 500.0;
/// Availability rate below which more pets are recommended
pub const LOW_AVAILABILITY_RATE: f64 = 30.0;

/// Map a rounded adoption rate onto a tier
pub fn tier_for_rate(rate: f64) -> Tier {
    if rate > EXCELLENT_ADOPTION_RATE {
        Tier::Excellent
    } else if rate > GOOD_ADOPTION_RATE {
        Tier::Good
    } else {
        Tier::NeedsAttention
    }
}

/// Classify a snapshot and render its health narrative
pub fn classify(snapshot: &SystemSnapshot) -> HealthAssessment {
    let pets = &snapshot.pets;
    let adoption_rate = snapshot.adoption_rate();
    // Without pets there is nothing available, which still merits the
    // "add pets" recommendation.
    let availability_rate = snapshot.availability_rate().unwrap_or(0.0);
    let tier = adoption_rate.map(tier_for_rate);

    let mut out = String::from("🏥 **ANÁLISIS DE SALUD DEL SISTEMA ADOPTAFÁCIL**\n\n");

    if let (Some(rate), Some(tier)) = (adoption_rate, tier) {
        let _ = writeln!(out, "📊 **MÉTRICAS PRINCIPALES:**");
        let _ = writeln!(out, "• Total de mascotas: {}", pets.total);
        let _ = writeln!(
            out,
            "• Mascotas disponibles: {} ({}%)",
            pets.available,
            percent(availability_rate)
        );
        let _ = writeln!(
            out,
            "• Mascotas adoptadas: {} ({}%)",
            pets.adopted,
            percent(rate)
        );
        let _ = writeln!(out, "• Tasa de adopción: {}%\n", percent(rate));

        out.push_str(match tier {
            Tier::Excellent => {
                "✅ **ESTADO: EXCELENTE**\nEl sistema muestra una tasa de adopción muy alta. ¡Felicitaciones!\n\n"
            }
            Tier::Good => {
                "🟡 **ESTADO: BUENO**\nEl sistema funciona bien, pero hay oportunidades de mejora.\n\n"
            }
            Tier::NeedsAttention => {
                "🔴 **ESTADO: NECESITA ATENCIÓN**\nLa tasa de adopción es baja. Se requieren acciones inmediatas.\n\n"
            }
        });
    }

    let adoptions = &snapshot.adoptions;
    let _ = writeln!(out, "🐾 **ANÁLISIS DE ADOPCIONES:**");
    let _ = writeln!(out, "• Total de solicitudes: {}", adoptions.total);
    let _ = writeln!(out, "• Solicitudes pendientes: {}", adoptions.pending);
    if adoptions.pending > PENDING_ALERT {
        out.push_str(
            "⚠️ ALERTA: Hay muchas solicitudes pendientes. Revisar proceso de aprobación.\n",
        );
    }
    out.push('\n');

    let donations = &snapshot.donations;
    let _ = writeln!(out, "💰 **ANÁLISIS DE DONACIONES:**");
    let _ = writeln!(out, "• Total de donaciones: {}", donations.total);
    let _ = writeln!(
        out,
        "• Monto total recaudado: ${}",
        money(donations.total_amount)
    );
    if donations.total_amount > EXCELLENT_DONATIONS {
        out.push_str("✅ Excelente nivel de donaciones recibidas.\n");
    } else {
        out.push_str("📈 Oportunidad de mejorar las campañas de donación.\n");
    }
    out.push('\n');

    out.push_str("💡 **RECOMENDACIONES:**\n");
    if availability_rate < LOW_AVAILABILITY_RATE {
        out.push_str("• Agregar más mascotas al sistema\n");
    }
    if adoptions.pending > PENDING_REVIEW {
        out.push_str("• Acelerar el proceso de revisión de adopciones\n");
    }
    if donations.total_amount < LOW_DONATIONS {
        out.push_str("• Implementar campañas de donación más efectivas\n");
    }
    out.push_str("• Mantener actualizada la información de las mascotas\n");
    out.push_str("• Promover el sistema en redes sociales\n");

    HealthAssessment {
        tier,
        adoption_rate,
        narrative: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total: i64, available: i64, adopted: i64) -> SystemSnapshot {
        let mut s = SystemSnapshot::default();
        s.pets.total = total;
        s.pets.available = available;
        s.pets.adopted = adopted;
        s
    }

    #[test]
    fn test_no_pets_omits_metrics_and_tier() {
        let assessment = classify(&SystemSnapshot::default());
        assert_eq!(assessment.tier, None);
        assert_eq!(assessment.adoption_rate, None);
        assert!(!assessment.narrative.contains("MÉTRICAS PRINCIPALES"));
        assert!(!assessment.narrative.contains('%'));
        assert!(!assessment.narrative.contains("ESTADO"));
        assert!(assessment.narrative.contains("• Agregar más mascotas al sistema"));
    }

    #[test]
    fn test_excellent_scenario() {
        let mut s = snapshot(100, 20, 75);
        s.adoptions.total = 50;
        s.adoptions.pending = 3;
        s.donations.total_amount = 1500.0;

        let assessment = classify(&s);
        assert_eq!(assessment.tier, Some(Tier::Excellent));
        assert_eq!(assessment.adoption_rate, Some(75.0));

        let n = &assessment.narrative;
        assert!(n.starts_with("🏥 **ANÁLISIS DE SALUD DEL SISTEMA ADOPTAFÁCIL**\n\n"));
        assert!(n.contains("• Mascotas disponibles: 20 (20%)\n"));
        assert!(n.contains("• Mascotas adoptadas: 75 (75%)\n"));
        assert!(n.contains("• Tasa de adopción: 75%\n\n"));
        assert!(n.contains("✅ **ESTADO: EXCELENTE**"));
        assert!(n.contains("• Monto total recaudado: $1,500.00\n"));
        assert!(n.contains("✅ Excelente nivel de donaciones recibidas."));
        // availability 20% < 30%
        assert!(n.contains("• Agregar más mascotas al sistema"));
        assert!(!n.contains("Acelerar el proceso"));
        assert!(!n.contains("campañas de donación más efectivas"));
        assert!(!n.contains("ALERTA"));
    }

    #[test]
    fn test_tier_breakpoints_are_exclusive() {
        assert_eq!(tier_for_rate(70.1), Tier::Excellent);
        assert_eq!(tier_for_rate(70.0), Tier::Good);
        assert_eq!(tier_for_rate(50.1), Tier::Good);
        assert_eq!(tier_for_rate(50.0), Tier::NeedsAttention);
        assert_eq!(tier_for_rate(0.0), Tier::NeedsAttention);
    }

    #[test]
    fn test_tier_uses_rounded_rate() {
        // 70.04% rounds to 70.0, which is not above 70
        let assessment = classify(&snapshot(10_000, 0, 7_004));
        assert_eq!(assessment.adoption_rate, Some(70.0));
        assert_eq!(assessment.tier, Some(Tier::Good));
    }

    #[test]
    fn test_tier_monotonic_in_adopted() {
        let mut last = Tier::NeedsAttention;
        let rank = |t: Tier| match t {
            Tier::NeedsAttention => 0,
            Tier::Good => 1,
            Tier::Excellent => 2,
        };
        for adopted in 0..=100 {
            let tier = classify(&snapshot(100, 0, adopted)).tier.unwrap();
            assert!(rank(tier) >= rank(last));
            last = tier;
        }
        assert_eq!(last, Tier::Excellent);
    }

    #[test]
    fn test_pending_alert_and_review_lines() {
        let mut s = snapshot(10, 5, 5);
        s.adoptions.pending = 11;
        let n = classify(&s).narrative;
        assert!(n.contains("⚠️ ALERTA: Hay muchas solicitudes pendientes."));
        assert!(n.contains("• Acelerar el proceso de revisión de adopciones"));
        assert!(n.contains("🔴 **ESTADO: NECESITA ATENCIÓN**"));

        s.adoptions.pending = 6;
        let n = classify(&s).narrative;
        assert!(!n.contains("ALERTA"));
        assert!(n.contains("• Acelerar el proceso de revisión de adopciones"));
    }

    #[test]
    fn test_low_donations() {
        let mut s = snapshot(10, 5, 6);
        s.donations.total_amount = 499.99;
        let assessment = classify(&s);
        assert_eq!(assessment.tier, Some(Tier::Good));
        assert!(assessment
            .narrative
            .contains("📈 Oportunidad de mejorar las campañas de donación."));
        assert!(assessment
            .narrative
            .contains("• Implementar campañas de donación más efectivas"));
    }

    #[test]
    fn test_classifier_is_idempotent() {
        let mut s = snapshot(37, 11, 19);
        s.adoptions.pending = 7;
        s.donations.total_amount = 812.4;
        assert_eq!(classify(&s).narrative, classify(&s).narrative);
    }

    #[test]
    fn test_narrative_ends_with_constant_lines() {
        let n = classify(&snapshot(1, 1, 0)).narrative;
        assert!(n.ends_with(
            "• Mantener actualizada la información de las mascotas\n• Promover el sistema en redes sociales\n"
        ));
    }
}
