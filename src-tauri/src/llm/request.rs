//! Request builder: IdentificationRequest → Gemini `generateContent` body.
//!
//! Pure construction, no I/O. Part order matters to the model: the image
//! goes first so the text reads as a question about it.

use serde::Serialize;

use super::prompts::{DEFAULT_IMAGE_PROMPT, SYSTEM_INSTRUCTION, TEMPERATURE};
use super::types::IdentificationRequest;

/// Body of `POST models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub tools: Vec<Tool>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// Tool declaration. Only Google Search grounding is used.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
}

/// Assemble the request body for one identification.
pub fn build_request(request: &IdentificationRequest) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);

    if let Some(image) = request.image() {
        parts.push(Part::InlineData {
            inline_data: Blob {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        });
    }

    let text = if request.text_prompt().trim().is_empty() {
        DEFAULT_IMAGE_PROMPT.to_string()
    } else {
        request.text_prompt().to_string()
    };
    parts.push(Part::Text { text });

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts,
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part::Text {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        },
        tools: vec![Tool {
            google_search: GoogleSearch::default(),
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}
