//! Title, slug and tag suggestions from a local text-generation service.
//!
//! The service is treated as an untrusted oracle: one request per note, no
//! retries, and anything that does not parse into the expected shape is an
//! error the caller answers with [`Suggestion::with_fallbacks`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::note::extract_h1;
use crate::slug::{FALLBACK_SLUG, slugify};
use crate::tags::quote;

pub const UNTITLED: &str = "Untitled";
pub const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub slug: String,
    pub tags: Vec<String>,
}

impl Suggestion {
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.slug.trim().is_empty()
            && self.tags.is_empty()
    }

    /// Review-collection notes keep their own title and are named after the
    /// directory holding them, whatever the oracle said.
    pub fn pin_to_collection(&mut self, existing_title: &str, dir_name: &str) {
        self.title = existing_title.to_string();
        self.slug = dir_name.to_string();
    }

    /// Fill an empty title from the note (existing title, then first
    /// heading, then [`UNTITLED`]) and an empty slug from the title.
    pub fn with_fallbacks(mut self, existing_title: &str, body: &str) -> Self {
        if self.title.trim().is_empty() {
            self.title = existing_title.to_string();
        }
        if self.title.trim().is_empty() {
            let h1 = extract_h1(body);
            self.title = if h1.is_empty() { UNTITLED.to_string() } else { h1 };
        }
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.title);
        }
        if self.slug.is_empty() {
            self.slug = FALLBACK_SLUG.to_string();
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("could not decode server response: {0}")]
    Decode(String),
    #[error("no JSON object in response")]
    NoJson,
    #[error("invalid suggestion JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inputs for one suggestion call.
#[derive(Debug, Clone)]
pub struct SuggestRequest<'a> {
    pub existing_title: &'a str,
    pub excerpt: &'a str,
    pub max_slug: usize,
    pub timeout: Duration,
}

pub trait Suggester {
    fn suggest(&self, request: &SuggestRequest<'_>) -> Result<Suggestion, SuggestError>;

    /// Name used in log lines.
    fn name(&self) -> &str;
}

/// Never calls out; every note goes straight to the fallbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl Suggester for Offline {
    fn suggest(&self, _request: &SuggestRequest<'_>) -> Result<Suggestion, SuggestError> {
        Ok(Suggestion::default())
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: String,
    prompt: String,
    stream: bool,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}

/// Client for an Ollama-style `/api/generate` endpoint.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Result<Self, SuggestError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(SuggestError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl Suggester for OllamaClient {
    fn suggest(&self, request: &SuggestRequest<'_>) -> Result<Suggestion, SuggestError> {
        let body = GenerateRequest {
            model: &self.model,
            system: system_prompt(request.max_slug),
            prompt: user_prompt(request.existing_title, request.excerpt),
            stream: false,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint())
            .timeout(request.timeout)
            .json(&body)
            .send()
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }

        let generated: GenerateResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                SuggestError::Timeout
            } else {
                SuggestError::Decode(e.to_string())
            }
        })?;
        log::debug!("{} answered {} bytes", self.name(), generated.response.len());
        parse_suggestion(&generated.response)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn classify(e: reqwest::Error) -> SuggestError {
    if e.is_timeout() {
        SuggestError::Timeout
    } else if e.is_connect() {
        SuggestError::Unreachable(e.to_string())
    } else {
        SuggestError::Transport(e.to_string())
    }
}

pub fn system_prompt(max_slug: usize) -> String {
    format!(
        r##"You generate a note title, file slug, and tags for a Zettelkasten note.
Return ONLY valid JSON with keys "title", "slug", and "tags". No markdown, no commentary, no code fences.

Rules:
- Use the content as the primary signal; the existing title is secondary.
- title: short, specific, not generic.
- slug: lowercase ASCII, hyphen-separated, no punctuation except hyphen, no leading/trailing hyphen.
- slug should be <= {max_slug} characters if possible.
- tags: 3 to 7 items.
- tag format: MUST be hashtag strings like "#kebab-case".
- tags should be topical (concepts/entities), not meta like "#note" or "#zettelkasten".
If you cannot comply, return {{"title":"","slug":"","tags":[]}}."##
    )
}

pub fn user_prompt(existing_title: &str, excerpt: &str) -> String {
    format!(
        "Existing title (may be empty): {}\n\nNote content:\n{}\n\nReturn JSON now.",
        quote(existing_title),
        excerpt
    )
}

/// At most `max_chars` characters from the start of `body`.
pub fn excerpt(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Pull the outermost `{...}` out of free-form model output and parse it.
pub fn parse_suggestion(output: &str) -> Result<Suggestion, SuggestError> {
    let trimmed = output.trim();
    let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) else {
        return Err(SuggestError::NoJson);
    };
    if end <= start {
        return Err(SuggestError::NoJson);
    }
    Ok(serde_json::from_str(&trimmed[start..=end])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::io::Write;
    use std::time::Instant;

    fn request<'a>(title: &'a str, body: &'a str) -> SuggestRequest<'a> {
        SuggestRequest {
            existing_title: title,
            excerpt: body,
            max_slug: 60,
            timeout: Duration::from_secs(5),
        }
    }

    fn generate_body(response: &str) -> String {
        json!({ "response": response, "done": true }).to_string()
    }

    #[test]
    fn test_parse_suggestion_with_surrounding_noise() {
        let out = "Sure! Here you go:\n```json\n{\"title\":\"Tmux Panes\",\"slug\":\"tmux-panes\",\"tags\":[\"#tmux\"]}\n```";
        let sug = parse_suggestion(out).unwrap();
        assert_eq!(sug.title, "Tmux Panes");
        assert_eq!(sug.slug, "tmux-panes");
        assert_eq!(sug.tags, vec!["#tmux"]);
    }

    #[test]
    fn test_parse_suggestion_errors() {
        assert!(matches!(parse_suggestion("no json at all"), Err(SuggestError::NoJson)));
        assert!(matches!(parse_suggestion("} backwards {"), Err(SuggestError::NoJson)));
        assert!(matches!(parse_suggestion("{not json}"), Err(SuggestError::Parse(_))));
        assert!(matches!(
            parse_suggestion(r#"{"title":"only title"}"#),
            Err(SuggestError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_object_is_a_valid_empty_suggestion() {
        let sug = parse_suggestion(r#"{"title":"","slug":"","tags":[]}"#).unwrap();
        assert!(sug.is_empty());
    }

    #[test]
    fn test_fallback_chain() {
        let sug = Suggestion::default().with_fallbacks("Existing", "body");
        assert_eq!(sug.title, "Existing");
        assert_eq!(sug.slug, "existing");

        let sug = Suggestion::default().with_fallbacks("", "intro\n# Heading Here\n");
        assert_eq!(sug.title, "Heading Here");
        assert_eq!(sug.slug, "heading-here");

        let sug = Suggestion::default().with_fallbacks("", "no heading");
        assert_eq!(sug.title, UNTITLED);
        assert_eq!(sug.slug, "untitled");

        let sug = Suggestion::default().with_fallbacks("日本語", "");
        assert_eq!(sug.title, "日本語");
        assert_eq!(sug.slug, FALLBACK_SLUG);
    }

    #[test]
    fn test_fallbacks_keep_oracle_values() {
        let sug = Suggestion {
            title: "From Oracle".into(),
            slug: "oracle-slug".into(),
            tags: vec!["#x".into()],
        }
        .with_fallbacks("Existing", "body");
        assert_eq!(sug.title, "From Oracle");
        assert_eq!(sug.slug, "oracle-slug");
        assert_eq!(sug.tags, vec!["#x"]);
    }

    #[test]
    fn test_pin_to_collection_overrides_title_and_slug() {
        let mut sug = Suggestion {
            title: "Oracle Title".into(),
            slug: "oracle-slug".into(),
            tags: vec!["#stoicism".into()],
        };
        sug.pin_to_collection("My Review", "The Obstacle Is the Way");
        assert_eq!(sug.title, "My Review");
        assert_eq!(sug.slug, "The Obstacle Is the Way");
        assert_eq!(sug.tags, vec!["#stoicism"]);
    }

    #[test]
    fn test_excerpt_counts_chars() {
        assert_eq!(excerpt("héllo wörld", 5), "héllo");
        assert_eq!(excerpt("short", 100), "short");
    }

    #[test]
    fn test_prompts() {
        assert!(system_prompt(42).contains("<= 42 characters"));
        assert!(system_prompt(42).contains(r#"{"title":"","slug":"","tags":[]}"#));
        let prompt = user_prompt("Old \"T\"", "content");
        assert!(prompt.starts_with("Existing title (may be empty): \"Old \\\"T\\\"\""));
        assert!(prompt.contains("Note content:\ncontent\n"));
    }

    #[test]
    fn test_ollama_client_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/generate")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "model": "zettel",
                "stream": false,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(generate_body(
                "noise {\"title\":\"Wayland Clipboard\",\"slug\":\"wayland-clipboard\",\"tags\":[\"#wayland\",\"#wl-clipboard\"]} trailing",
            ))
            .expect(1)
            .create();

        let client = OllamaClient::new(&format!("{}/", server.url()), "zettel").unwrap();
        let sug = client.suggest(&request("", "copy with wl-copy")).unwrap();
        assert_eq!(sug.title, "Wayland Clipboard");
        assert_eq!(sug.tags, vec!["#wayland", "#wl-clipboard"]);
        mock.assert();
    }

    #[test]
    fn test_ollama_client_non_success_status() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("model not loaded")
            .expect(1)
            .create();

        let client = OllamaClient::new(&server.url(), "zettel").unwrap();
        let err = client.suggest(&request("T", "body")).unwrap_err();
        assert!(matches!(err, SuggestError::Status(500)), "{err}");
        mock.assert();
    }

    #[test]
    fn test_ollama_client_unparsable_response() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(generate_body("I cannot help with that."))
            .create();

        let client = OllamaClient::new(&server.url(), "zettel").unwrap();
        let err = client.suggest(&request("T", "body")).unwrap_err();
        assert!(matches!(err, SuggestError::NoJson), "{err}");
    }

    #[test]
    fn test_ollama_client_garbage_envelope() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body("<html>proxy error</html>")
            .create();

        let client = OllamaClient::new(&server.url(), "zettel").unwrap();
        let err = client.suggest(&request("T", "body")).unwrap_err();
        assert!(matches!(err, SuggestError::Decode(_)), "{err}");
    }

    #[test]
    fn test_ollama_client_deadline() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(generate_body("{}").as_bytes())
            })
            .create();

        let client = OllamaClient::new(&server.url(), "zettel").unwrap();
        let late = SuggestRequest { timeout: Duration::from_millis(200), ..request("T", "body") };
        let started = Instant::now();
        let err = client.suggest(&late).unwrap_err();
        assert!(matches!(err, SuggestError::Timeout), "{err}");
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[test]
    fn test_ollama_client_unreachable() {
        let client = OllamaClient::new("http://127.0.0.1:1", "zettel").unwrap();
        let err = client.suggest(&request("T", "body")).unwrap_err();
        assert!(
            matches!(err, SuggestError::Unreachable(_) | SuggestError::Transport(_)),
            "{err}"
        );
    }

    #[test]
    fn test_offline_returns_empty() {
        let sug = Offline.suggest(&request("T", "body")).unwrap();
        assert!(sug.is_empty());
        assert_eq!(Offline.name(), "offline");
    }
}
