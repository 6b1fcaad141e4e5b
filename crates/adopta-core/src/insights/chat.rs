//! Keyword-routed chat replies
//!
//! Routing is a plain substring match of the lower-cased message against an
//! ordered list. Order matters: "hola, cuantas mascotas hay" is a greeting.

use std::fmt::Write;

use super::format::money;
use super::snapshot::SystemSnapshot;
use super::types::ChatIntent;

/// Routing table, checked top to bottom; first hit wins
pub const INTENT_ROUTES: &[(ChatIntent, &[&str])] = &[
    (ChatIntent::Greeting, &["hola", "hi"]),
    (ChatIntent::Pets, &["mascota", "pet"]),
    (ChatIntent::Adoptions, &["adopcion", "adoption"]),
    (ChatIntent::Donations, &["donacion", "donation"]),
    (ChatIntent::Users, &["usuario", "user"]),
    (ChatIntent::Problems, &["problema", "error"]),
    (ChatIntent::Recommendations, &["recomendacion", "consejo"]),
];

/// Pending requests above which the adoptions reply asks for a review
pub const CHAT_PENDING_REVIEW: i64 = 5;
/// Donation total above which the donations reply celebrates
pub const CHAT_GOOD_DONATIONS: f64 = 1000.0;
/// Recent registrations above which the users reply celebrates
pub const CHAT_ACTIVE_REGISTRATIONS: i64 = 10;
/// Pending requests above which the problems reply lists a backlog
pub const PROBLEM_PENDING: i64 = 10;
/// Donation total below which the problems reply lists low donations
pub const PROBLEM_LOW_DONATIONS: f64 = 100.0;

/// Resolve the intent of a message
pub fn route(message: &str) -> ChatIntent {
    let lowered = message.to_lowercase();
    INTENT_ROUTES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(intent, _)| *intent)
        .unwrap_or(ChatIntent::Fallback)
}

/// Produce the canned reply for a message
pub fn respond(message: &str, snapshot: &SystemSnapshot) -> String {
    match route(message) {
        ChatIntent::Greeting => greeting(),
        ChatIntent::Pets => pets_reply(snapshot),
        ChatIntent::Adoptions => adoptions_reply(snapshot),
        ChatIntent::Donations => donations_reply(snapshot),
        ChatIntent::Users => users_reply(snapshot),
        ChatIntent::Problems => problems_reply(snapshot),
        ChatIntent::Recommendations => recommendations_reply(),
        ChatIntent::Fallback => fallback(message),
    }
}

fn greeting() -> String {
    "¡Hola! Soy tu agente inteligente de AdoptaFácil. Puedo ayudarte con:\n\n\
     • Análisis del estado del sistema\n\
     • Estadísticas de adopciones y donaciones\n\
     • Recomendaciones para mejorar el sistema\n\
     • Detección de problemas o anomalías\n\n\
     ¿En qué puedo ayudarte hoy?"
        .to_string()
}

fn pets_reply(snapshot: &SystemSnapshot) -> String {
    let pets = &snapshot.pets;
    let mut out = format!(
        "📊 **Estado actual de mascotas:**\n\n\
         • Total de mascotas: {}\n\
         • Disponibles para adopción: {}\n\
         • Ya adoptadas: {}\n\n",
        pets.total, pets.available, pets.adopted
    );

    if pets.available > 0 {
        let _ = write!(
            out,
            "¡Tenemos {} mascotas esperando un hogar! 🐾",
            pets.available
        );
    } else {
        out.push_str(
            "⚠️ No hay mascotas disponibles actualmente. Considera agregar más al sistema.",
        );
    }
    out
}

fn adoptions_reply(snapshot: &SystemSnapshot) -> String {
    let adoptions = &snapshot.adoptions;
    let mut out = format!(
        "🏠 **Estado de adopciones:**\n\n\
         • Total de solicitudes: {}\n\
         • Pendientes de revisión: {}\n\
         • Aprobadas: {}\n\n",
        adoptions.total, adoptions.pending, adoptions.approved
    );

    if adoptions.pending > CHAT_PENDING_REVIEW {
        let _ = write!(
            out,
            "⚠️ Hay {} solicitudes pendientes. Te recomiendo revisarlas pronto.",
            adoptions.pending
        );
    } else {
        out.push_str("✅ El proceso de adopciones está funcionando bien.");
    }
    out
}

fn donations_reply(snapshot: &SystemSnapshot) -> String {
    let donations = &snapshot.donations;
    let mut out = format!(
        "💰 **Estado de donaciones:**\n\n\
         • Total de donaciones: {}\n\
         • Monto recaudado: ${}\n\n",
        donations.total,
        money(donations.total_amount)
    );

    if donations.total_amount > CHAT_GOOD_DONATIONS {
        out.push_str("🎉 ¡Excelente! Las donaciones están yendo muy bien.");
    } else {
        out.push_str("📈 Considera implementar campañas para aumentar las donaciones.");
    }
    out
}

fn users_reply(snapshot: &SystemSnapshot) -> String {
    let users = &snapshot.users;
    let mut out = format!(
        "👥 **Estado de usuarios:**\n\n\
         • Total de usuarios: {}\n\
         • Registros recientes: {}\n\n",
        users.total, users.recent_registrations
    );

    if users.recent_registrations > CHAT_ACTIVE_REGISTRATIONS {
        out.push_str("📈 ¡Genial! Hay mucha actividad de nuevos usuarios.");
    } else {
        out.push_str("💡 Considera estrategias de marketing para atraer más usuarios.");
    }
    out
}

fn problems_reply(snapshot: &SystemSnapshot) -> String {
    let mut issues = Vec::new();
    if snapshot.pets.available == 0 {
        issues.push("• No hay mascotas disponibles");
    }
    if snapshot.adoptions.pending > PROBLEM_PENDING {
        issues.push("• Muchas adopciones pendientes");
    }
    if snapshot.donations.total_amount < PROBLEM_LOW_DONATIONS {
        issues.push("• Pocas donaciones recibidas");
    }

    let mut out = String::from("🔍 **Análisis de problemas potenciales:**\n\n");
    if issues.is_empty() {
        out.push_str("✅ No se detectaron problemas críticos en el sistema.");
    } else {
        out.push_str("⚠️ Problemas detectados:\n");
        out.push_str(&issues.join("\n"));
    }
    out
}

fn recommendations_reply() -> String {
    "💡 **Recomendaciones principales:**\n\n\
     • Mantén actualizada la información de las mascotas\n\
     • Responde rápidamente a las solicitudes de adopción\n\
     • Promociona el sistema en redes sociales\n\
     • Organiza eventos de adopción regularmente\n\
     • Implementa campañas de donación creativas\n\n\
     ¿Te gustaría que profundice en alguna de estas áreas?"
        .to_string()
}

fn fallback(message: &str) -> String {
    format!(
        "Entiendo tu consulta sobre: \"{}\"\n\n\
         Como agente inteligente de AdoptaFácil, puedo ayudarte con:\n\n\
         • Estadísticas del sistema (mascotas, adopciones, donaciones)\n\
         • Análisis de rendimiento\n\
         • Detección de problemas\n\
         • Recomendaciones de mejora\n\n\
         ¿Podrías ser más específico sobre qué información necesitas?",
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_wins_over_pets() {
        assert_eq!(route("hola, cuantas mascotas hay"), ChatIntent::Greeting);
    }

    #[test]
    fn test_routing_is_case_insensitive() {
        assert_eq!(route("MASCOTAS disponibles"), ChatIntent::Pets);
        assert_eq!(route("Estado de las ADOPCIONES"), ChatIntent::Adoptions);
    }

    #[test]
    fn test_each_intent() {
        let cases = [
            ("quiero ver las mascotas", ChatIntent::Pets),
            ("adoption status", ChatIntent::Adoptions),
            ("total de donaciones", ChatIntent::Donations),
            ("cuantos usuarios", ChatIntent::Users),
            ("hay algun problema", ChatIntent::Problems),
            ("dame un consejo", ChatIntent::Recommendations),
            ("qué tal el clima", ChatIntent::Fallback),
        ];
        for (message, expected) in cases {
            assert_eq!(route(message), expected, "message: {}", message);
        }
    }

    #[test]
    fn test_accented_keywords_do_not_match() {
        // "adopción" does not contain "adopcion"
        assert_eq!(route("adopción"), ChatIntent::Fallback);
    }

    #[test]
    fn test_hi_matches_inside_words() {
        // "hi" is a plain substring check, so "archivo" is a greeting
        assert_eq!(route("archivo de usuarios"), ChatIntent::Greeting);
    }

    #[test]
    fn test_pets_reply() {
        let mut s = SystemSnapshot::default();
        s.pets.total = 5;
        s.pets.available = 3;
        s.pets.adopted = 2;
        let reply = respond("mascotas", &s);
        assert!(reply.contains("• Disponibles para adopción: 3\n"));
        assert!(reply.ends_with("¡Tenemos 3 mascotas esperando un hogar! 🐾"));

        s.pets.available = 0;
        assert!(respond("pets", &s).contains("No hay mascotas disponibles actualmente"));
    }

    #[test]
    fn test_adoptions_reply_threshold() {
        let mut s = SystemSnapshot::default();
        s.adoptions.pending = 6;
        assert!(respond("adopcion", &s)
            .ends_with("⚠️ Hay 6 solicitudes pendientes. Te recomiendo revisarlas pronto."));
        s.adoptions.pending = 5;
        assert!(respond("adopcion", &s).ends_with("✅ El proceso de adopciones está funcionando bien."));
    }

    #[test]
    fn test_donations_reply_formats_money() {
        let mut s = SystemSnapshot::default();
        s.donations.total = 4;
        s.donations.total_amount = 2500.5;
        let reply = respond("donacion", &s);
        assert!(reply.contains("• Monto recaudado: $2,500.50\n"));
        assert!(reply.contains("🎉"));
    }

    #[test]
    fn test_users_reply_threshold() {
        let mut s = SystemSnapshot::default();
        s.users.recent_registrations = 11;
        assert!(respond("usuario", &s).contains("mucha actividad"));
        s.users.recent_registrations = 10;
        assert!(respond("usuario", &s).contains("estrategias de marketing"));
    }

    #[test]
    fn test_problems_reply() {
        let s = SystemSnapshot::default();
        let reply = respond("problema", &s);
        assert!(reply.contains(
            "⚠️ Problemas detectados:\n• No hay mascotas disponibles\n• Pocas donaciones recibidas"
        ));

        let mut healthy = SystemSnapshot::default();
        healthy.pets.available = 4;
        healthy.donations.total_amount = 100.0;
        assert!(respond("error", &healthy).ends_with("✅ No se detectaron problemas críticos en el sistema."));
    }

    #[test]
    fn test_fallback_echoes_original_message() {
        let reply = respond("¿Qué Tal?", &SystemSnapshot::default());
        assert!(reply.starts_with("Entiendo tu consulta sobre: \"¿Qué Tal?\"\n\n"));
    }

    #[test]
    fn test_respond_is_deterministic() {
        let mut s = SystemSnapshot::default();
        s.pets.total = 9;
        assert_eq!(respond("mascota", &s), respond("mascota", &s));
    }
}
