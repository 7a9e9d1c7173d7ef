//! Prompt and model constants for font identification.
//!
//! The system instruction is the contract between Font Detective and the
//! model. The result parser in extract.rs relies on the "start with the
//! font name in bold" rule below.

/// Default Gemini model. Overridable with `GEMINI_MODEL`.
pub const MODEL: &str = "gemini-2.5-flash";

/// Low temperature: factual consistency over creative variation.
pub const TEMPERATURE: f32 = 0.3;

/// Text sent when the user attaches an image but types nothing.
pub const DEFAULT_IMAGE_PROMPT: &str = "Identify the font in this image.";

/// Shown by the shell when neither a prompt nor an image was given.
pub const VALIDATION_MESSAGE: &str = "Please upload an image or describe a font.";

/// Shown by the shell when a failure carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to identify font. Please try again.";

/// One-click prompts offered when no image is loaded.
pub const SAMPLE_PROMPTS: [&str; 4] = [
    "What is the font used in the Netflix logo?",
    "A futuristic sci-fi font that looks like data",
    "The font from the 1980s Apple Macintosh marketing",
    "A classic serif font used in fashion magazines like Vogue",
];

/// System instruction attached to every identification request.
pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert Typographer and Font Detective. Your task is to strictly identify fonts provided in user images or descriptions.

PROCESS:
1.  **Analyze**:
    -   If an image is provided, examine the glyphs, terminals, serifs, x-height, and overall weight.
    -   If text is provided, analyze the historical or stylistic description.
2.  **Identify**: Determine the most likely font match. If the exact font is custom or unknown, identify the closest retail alternative.
3.  **Search**: Use Google Search to find specific, reputable download pages.
4.  **Report**: Provide the font name, the designer/foundry, a brief description of its characteristics, and context on where it is typically used.

OUTPUT FORMAT:
Return a clear, natural language response.
Start with the name of the font in bold.
"#;
