use crate::ImageStyle;

pub const PHARMACIST_INSTRUCTION: &str = "You are a highly qualified and helpful virtual pharmacy assistant. \
Your goal is to help pharmacists and patients with information about medicines, drug interactions, \
dosage, therapeutic categories and general health advice. Be professional, precise and empathetic. \
If you do not know a critical piece of information, or if there is a serious risk, recommend \
consulting a specialist physician.";

/// Used when the chat model answers with no text at all.
pub const EMPTY_CHAT_REPLY: &str = "Sorry, I couldn't process your reply.";

pub fn style_modifier(style: ImageStyle) -> &'static str {
    match style {
        ImageStyle::Rustic => {
            "Dark wooden background, moody cinematic lighting, rustic pharmaceutical aesthetic, \
             high contrast, elegant glass bottles, dried herbs in background, 4k resolution, photorealistic."
        }
        ImageStyle::Modern => {
            "Bright clinical studio lighting, pure white background, clean minimalist design, \
             modern packaging, sterile environment, sharp focus, 4k resolution, high key photography."
        }
        ImageStyle::Social => {
            "Top-down flat lay view, colorful pop pastel background, instagram aesthetic, \
             trendy composition, soft shadows, balanced props, high quality marketing asset."
        }
    }
}

pub fn build_image_prompt(name: &str, style: ImageStyle) -> String {
    format!(
        "A professional pharmaceutical product photography of {name}. {} \
         The image should look like a high-end commercial shot.",
        style_modifier(style)
    )
}
