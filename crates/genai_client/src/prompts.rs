//! Prompt templates sent to the generation service and the canned copy used
//! when the service cannot answer.

use shared::protocol::CopyBundle;

pub fn copywriting_prompt(course: &str) -> String {
    format!(
        r#"You are a world-class copywriter for university entrance exams (Vestibular) in Brazil.
Create a high-conversion, urgent, and energetic banner copy for the course: "{course}".

Requirements:
- Headline: Maximum 6 words. Punchy.
- Subtitle: Maximum 12 words. Benefit-driven.
- Discount: A realistic but attractive offer (e.g., "50% OFF", "Bolsa Mérito").
- CtaText: A strong call to action (e.g., "Inscreva-se", "Garanta sua Vaga").
- Colors: Suggest a Tailwind CSS "from" and "to" gradient color class based on the course psychology (e.g., Medicine=Blue/Green, Law=Red/Black, Arts=Purple/Pink)."#
    )
}

/// Prompt for the image model: a cutout-friendly studio shot.
pub fn studio_photo_prompt(course: &str) -> String {
    format!(
        "Professional studio photo of a happy brazilian university student studying {course}, \
         holding a related item, isolated on white background, full body shot, \
         commercial photography, 8k resolution"
    )
}

/// Prompt asking the text model to write a photography brief the operator
/// can paste into an external image tool.
pub fn photo_brief_prompt(course: &str) -> String {
    format!(
        r#"Create a highly detailed image generation prompt (optimized for Midjourney v6 or DALL-E 3) for a commercial studio photo of a Brazilian university student studying "{course}".

Requirements:
- Subject: Young adult, happy, confident, holding an object related to {course}.
- Style: High-end commercial advertising photography, sharp focus.
- Background: Plain solid white background (important for easy cutout).
- Lighting: Professional studio lighting, softbox.
- Shot: Full body or 3/4 body shot, standing.

Output ONLY the prompt text in English, no other words."#
    )
}

pub fn fallback_copy(course: &str) -> CopyBundle {
    CopyBundle {
        headline: Some(format!("Estude {course} Conosco")),
        subtitle: Some("Excelência acadêmica e futuro garantido.".into()),
        discount: Some("Condições Especiais".into()),
        cta_text: Some("Saiba Mais".into()),
        color_from: Some("from-gray-900".into()),
        color_to: Some("to-gray-700".into()),
    }
}
