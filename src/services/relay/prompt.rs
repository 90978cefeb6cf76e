//! Fixed radiology prompt and upstream request construction

use crate::schemas::openai::{ChatCompletionRequest, ChatMessage, ContentPart, ImageUrl};

use super::{ImageMime, RelayConfig};

/// Persona and report layout. The closing disclaimer must stay last.
pub const SYSTEM_PROMPT: &str = "Você é um radiologista especialista. Analise a imagem de raio X fornecida e forneça um diagnóstico seguindo este formato:

ANÁLISE RADIOLÓGICA:

• Campos pulmonares: [descrição detalhada]
• Silhueta cardíaca: [descrição do tamanho e contornos]
• Estruturas ósseas: [análise das costelas, clavículas, etc.]
• Mediastino: [avaliação dos contornos]
• Outros achados: [observações adicionais]

CONCLUSÃO: [diagnóstico resumido e recomendações]

IMPORTANTE: Este é um diagnóstico assistido por IA e deve ser validado por um médico.";

pub const USER_INSTRUCTION: &str =
    "Analise esta imagem de raio X e forneça um diagnóstico detalhado.";

/// Vision detail hint attached to the image part
pub const IMAGE_DETAIL: &str = "high";

/// `data:` URL embedding the encoded image
pub fn data_url(mime: ImageMime, payload: &str) -> String {
    format!("data:{};base64,{}", mime.as_str(), payload)
}

/// Build the single completion request for one image
pub fn build_request(config: &RelayConfig, payload: &str, mime: ImageMime) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user_parts(vec![
                ContentPart::Text {
                    text: USER_INSTRUCTION.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: data_url(mime, payload),
                        detail: Some(IMAGE_DETAIL.to_string()),
                    },
                },
            ]),
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}
