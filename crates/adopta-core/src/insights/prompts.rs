//! Prompts for the external model

use serde::Serialize;

use super::snapshot::SystemSnapshot;
use super::types::AnalysisKind;

/// System instruction for every analysis call
pub const ANALYSIS_SYSTEM_PROMPT: &str = "Eres un agente inteligente especializado en análisis de sistemas de adopción de mascotas. Proporciona análisis detallados, recomendaciones prácticas y detecta problemas potenciales.";

fn instruction(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::SystemHealth => {
            "Analiza la salud general del sistema. Identifica métricas clave, posibles problemas y recomendaciones para mejorar el rendimiento y la experiencia del usuario."
        }
        AnalysisKind::AdoptionOptimization => {
            "Analiza los datos de adopción y proporciona recomendaciones específicas para aumentar la tasa de adopción exitosa. Incluye estrategias de marketing, mejoras en el proceso y optimizaciones de la plataforma."
        }
        AnalysisKind::AnomalyDetection => {
            "Detecta patrones anómalos o irregularidades en los datos que podrían indicar problemas, fraude o oportunidades de mejora. Proporciona alertas y recomendaciones de acción."
        }
    }
}

/// User message for an analysis call: pretty JSON of the data, then the task
pub fn build_prompt<T: Serialize + ?Sized>(data: &T, kind: AnalysisKind) -> String {
    let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
    format!(
        "Datos del sistema AdoptaFácil:\n{}\n\n{}",
        json,
        instruction(kind)
    )
}

/// System instruction for a chat call, embedding the snapshot
pub fn chat_system_prompt(snapshot: &SystemSnapshot, context: Option<&str>) -> String {
    let json = serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string());
    let mut prompt = format!(
        "Eres un asistente inteligente para el sistema AdoptaFácil. Tienes acceso a los siguientes datos del sistema: {}",
        json
    );
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        prompt.push_str("\n\nContexto adicional: ");
        prompt.push_str(context);
    }
    prompt
}
