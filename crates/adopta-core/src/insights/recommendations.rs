//! Fixed adoption recommendations

/// Recommendation text; independent of any data
pub const ADOPTION_RECOMMENDATIONS: &str = "💡 **RECOMENDACIONES PARA OPTIMIZAR ADOPCIONES**\n\n\
🎯 **ESTRATEGIAS DE MARKETING:**\n\
• Crear perfiles detallados de mascotas con fotos de alta calidad\n\
• Implementar historias emotivas de cada mascota\n\
• Usar redes sociales para promocionar adopciones\n\
• Organizar eventos de adopción los fines de semana\n\n\
🔧 **MEJORAS DEL PROCESO:**\n\
• Simplificar el formulario de adopción\n\
• Implementar un sistema de seguimiento post-adopción\n\
• Crear un programa de voluntarios\n\
• Ofrecer servicios de entrenamiento básico\n\n\
📱 **OPTIMIZACIONES TÉCNICAS:**\n\
• Mejorar la búsqueda y filtros de mascotas\n\
• Implementar notificaciones push\n\
• Crear una app móvil\n\
• Integrar chat en tiempo real\n\n\
🤝 **ALIANZAS ESTRATÉGICAS:**\n\
• Colaborar con veterinarias locales\n\
• Asociarse con tiendas de mascotas\n\
• Trabajar con influencers de mascotas\n\
• Crear programas corporativos de adopción\n";

pub fn recommendations() -> &'static str {
    ADOPTION_RECOMMENDATIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_sections_of_four() {
        let text = recommendations();
        for header in [
            "🎯 **ESTRATEGIAS DE MARKETING:**",
            "🔧 **MEJORAS DEL PROCESO:**",
            "📱 **OPTIMIZACIONES TÉCNICAS:**",
            "🤝 **ALIANZAS ESTRATÉGICAS:**",
        ] {
            assert!(text.contains(header), "missing {}", header);
        }
        assert_eq!(text.matches("\n• ").count(), 16);
        assert!(text.ends_with("• Crear programas corporativos de adopción\n"));
    }
}
