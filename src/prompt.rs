//! Prompt text shared by the orchestrator and the suggestion fetcher.
//!
//! Everything here is pure: the same inputs always give the same text.

use crate::models::{Quality, Style, SuggestionCategory};
use serde_json::{json, Value};

/// Creative directive appended to the shared block, one per variant index.
pub const VARIANT_DIRECTIVES: [&str; 4] = [
    "Variasi 1 (kepatuhan inti): ikuti instruksi di atas seakurat mungkin dengan sudut kamera dan komposisi yang sama seperti foto asli.",
    "Variasi 2 (sudut kamera): ubah sudut pandang kamera, misalnya sedikit dari samping atau dari sudut rendah, sambil mempertahankan identitas orang tersebut.",
    "Variasi 3 (pencahayaan): ubah suasana pencahayaan, misalnya cahaya golden hour yang hangat atau cahaya studio yang lembut dari samping.",
    "Variasi 4 (sentuhan kreatif): tambahkan sentuhan kreatif pada latar belakang atau komposisi tanpa mengubah pose dan ekspresi yang diminta.",
];

pub fn style_instruction(style: Style) -> &'static str {
    match style {
        Style::Photorealistic => "Gaya: fotorealistis. Hasil harus terlihat seperti foto asli dari kamera profesional, dengan tekstur kulit alami, proporsi tubuh yang akurat, dan pencahayaan yang konsisten secara fisik.",
        Style::Artistic => "Gaya: artistik. Tafsirkan gambar dengan sentuhan ilustrasi atau lukisan digital, sapuan kuas yang ekspresif, dan palet warna yang harmonis, namun wajah tetap dapat dikenali.",
        Style::Cinematic => "Gaya: sinematik. Gunakan color grading ala film layar lebar, kedalaman bidang yang dangkal, kontras dramatis, dan komposisi seperti still frame film.",
    }
}

pub fn quality_instruction(quality: Quality) -> &'static str {
    match quality {
        Quality::Standard => "Kualitas: standar. Utamakan hasil yang bersih dan jelas tanpa artefak yang mengganggu.",
        Quality::High => "Kualitas: tinggi. Render detail halus seperti rambut, kain, dan mata dengan tajam serta resolusi tinggi.",
        Quality::VeryHigh => "Kualitas: sangat tinggi. Render dengan detail maksimal setara fotografi resolusi sangat tinggi, tanpa noise, blur, atau distorsi anatomi sedikit pun.",
    }
}

/// The base edit instruction a form submits: pose, expression and optional
/// free text.
pub fn compose_base_prompt(pose: &str, expression: &str, custom: &str) -> String {
    let mut prompt = format!(
        "Ubah orang di gambar ini. Terapkan pose berikut: \"{}\". Terapkan ekspresi wajah berikut: \"{}\".",
        pose.trim(),
        expression.trim()
    );
    let custom = custom.trim();
    if !custom.is_empty() {
        prompt.push_str(&format!(" Instruksi tambahan: \"{}\".", custom));
    }
    prompt.push_str(" Fokus pada perubahan yang realistis dan berkualitas tinggi.");
    prompt
}

pub fn instruction_block(base_prompt: &str, style: Style, quality: Quality) -> String {
    format!(
        "{}\n\n{}\n{}",
        base_prompt.trim(),
        style_instruction(style),
        quality_instruction(quality)
    )
}

/// Prompt for the 1-based variant `index`, or `None` past the last directive.
pub fn variant_prompt(block: &str, index: usize) -> Option<String> {
    let directive = VARIANT_DIRECTIVES.get(index.checked_sub(1)?)?;
    Some(format!("{}\n\n{}", block, directive))
}

pub fn suggestion_prompt(keyword: &str, category: SuggestionCategory) -> String {
    match category {
        SuggestionCategory::Pose => format!(
            "Berikan 5 variasi atau deskripsi yang lebih spesifik untuk pose tubuh berdasarkan kata kunci: \"{}\". Contohnya, jika kata kuncinya 'duduk', variasinya bisa 'duduk bersila' atau 'duduk santai'. Fokus hanya pada deskripsi pose tubuh.",
            keyword
        ),
        SuggestionCategory::Expression => format!(
            "Berikan 5 variasi atau deskripsi yang lebih spesifik untuk ekspresi wajah berdasarkan kata kunci: \"{}\". Contohnya, jika kata kuncinya 'senyum', variasinya bisa 'senyum tipis' atau 'senyum lebar'. Fokus hanya pada deskripsi ekspresi wajah.",
            keyword
        ),
    }
}

pub fn suggestion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn variants_are_distinct_and_deterministic() {
        let block = instruction_block("Ubah pose", Style::Cinematic, Quality::High);
        let first: Vec<String> = (1..=4).filter_map(|i| variant_prompt(&block, i)).collect();
        let second: Vec<String> = (1..=4).filter_map(|i| variant_prompt(&block, i)).collect();

        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
        assert_eq!(first.iter().collect::<HashSet<_>>().len(), 4);
        for prompt in &first {
            assert!(prompt.starts_with("Ubah pose"));
            assert!(prompt.contains(style_instruction(Style::Cinematic)));
            assert!(prompt.contains(quality_instruction(Quality::High)));
        }
    }

    #[test]
    fn variant_index_is_one_based() {
        assert!(variant_prompt("x", 0).is_none());
        assert!(variant_prompt("x", 5).is_none());
        assert!(variant_prompt("x", 1).unwrap().ends_with(VARIANT_DIRECTIVES[0]));
    }

    #[test]
    fn base_prompt_skips_empty_custom_instructions() {
        let without = compose_base_prompt("Duduk santai", "Senyum tipis", "  ");
        assert!(!without.contains("Instruksi tambahan"));

        let with = compose_base_prompt("Duduk santai", "Senyum tipis", "latar pantai");
        assert!(with.contains("Instruksi tambahan: \"latar pantai\""));
        assert!(with.contains("pose berikut: \"Duduk santai\""));
    }

    #[test]
    fn suggestion_prompt_embeds_keyword() {
        let prompt = suggestion_prompt("duduk", SuggestionCategory::Pose);
        assert!(prompt.contains("\"duduk\""));
        assert!(prompt.contains("pose tubuh"));
        assert!(suggestion_prompt("senyum", SuggestionCategory::Expression).contains("ekspresi wajah"));
    }
}
