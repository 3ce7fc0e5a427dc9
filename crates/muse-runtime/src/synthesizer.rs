//! Derivative-artifact synthesis.
//!
//! Converts final generated text into an audio reference. Thin by
//! design: the heavy lifting happens in the external speech service, and
//! this layer only constructs the reference handed back to the caller.

use urlencoding::encode;

/// Turns generated text plus a voice id into an audio reference.
pub trait ResponseSynthesizer: Send + Sync {
    fn audio_reference(&self, text: &str, voice: &str) -> String;
}

/// Builds a fetchable speech-synthesis URL for the generated text.
#[derive(Debug, Clone)]
pub struct UrlSynthesizer {
    base_url: String,
}

impl UrlSynthesizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for UrlSynthesizer {
    fn default() -> Self {
        Self::new("https://text.pollinations.ai")
    }
}

impl ResponseSynthesizer for UrlSynthesizer {
    fn audio_reference(&self, text: &str, voice: &str) -> String {
        format!(
            "{}/{}?model=openai-audio&voice={}",
            self.base_url.trim_end_matches('/'),
            encode(text),
            encode(voice)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_text_and_voice() {
        let synthesizer = UrlSynthesizer::new("https://speech.example.test/");
        let url = synthesizer.audio_reference("hello world & more", "nova");

        assert!(url.starts_with("https://speech.example.test/hello%20world"));
        assert!(url.contains("%26"));
        assert!(url.ends_with("voice=nova"));
        assert!(!url.contains("//hello"));
    }

    #[test]
    fn test_default_base() {
        let url = UrlSynthesizer::default().audio_reference("hi", "alloy");
        assert!(url.starts_with("https://text.pollinations.ai/hi"));
    }
}
