use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::language::{translate_summary, Language};
use crate::models::CompanyAnalysis;

/// The speech endpoint rejects longer queries
pub const MAX_CHUNK_CHARS: usize = 100;

const MAX_ATTEMPTS: u32 = 3;
const CONCURRENT_CHUNKS: usize = 4;

/// Result of rendering an analysis to audio
#[derive(Debug, Clone)]
pub struct SpeechOutput {
    pub audio_file: PathBuf,
    pub summary_text: String,
    pub language: Language,
}

/// Renders text to MP3 through a translate-style TTS endpoint
pub struct SpeechSynthesizer {
    client: Client,
    tts_url: String,
}

impl SpeechSynthesizer {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            tts_url: config.tts_url.clone(),
        })
    }

    /// Synthesize `text` and return the MP3 bytes.
    ///
    /// At most `CONCURRENT_CHUNKS` requests are in flight; chunks are joined
    /// in their original order.
    pub async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            anyhow::bail!("Nothing to synthesize: text is empty");
        }

        let total = chunks.len();
        let results: Vec<Result<Vec<u8>>> = stream::iter(chunks.into_iter().enumerate())
            .map(|(idx, chunk)| async move {
                self.fetch_chunk(&chunk, language, idx, total).await
            })
            .buffered(CONCURRENT_CHUNKS)
            .collect()
            .await;

        let mut audio = Vec::new();
        for result in results {
            audio.extend(result?);
        }

        info!(bytes = audio.len(), chunks = total, language = %language, "Synthesized speech");
        Ok(audio)
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: Language,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let url = tts_request_url(&self.tts_url, chunk, language, idx, total);

        for attempt in 0..MAX_ATTEMPTS {
            match self.try_fetch_chunk(&url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    if attempt == MAX_ATTEMPTS - 1 {
                        return Err(e)
                            .with_context(|| format!("Failed to synthesize chunk {}/{}", idx + 1, total));
                    }
                    let backoff = std::time::Duration::from_millis(500 * (2_u64.pow(attempt)));
                    warn!(error = %e, chunk = idx, ?backoff, "Speech request failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        anyhow::bail!("Failed to synthesize chunk {}/{}", idx + 1, total)
    }

    async fn try_fetch_chunk(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send speech request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Speech endpoint returned error: {}", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read speech response")?;
        debug!(bytes = bytes.len(), "Received speech chunk");

        Ok(bytes.to_vec())
    }

    /// Localize the analysis summary, speak it, and write the MP3 file.
    pub async fn generate_speech_for_analysis(
        &self,
        analysis: &CompanyAnalysis,
        language: Language,
        output: Option<PathBuf>,
    ) -> Result<SpeechOutput> {
        let summary_text = translate_summary(analysis, language);
        let audio = self.synthesize(&summary_text, language).await?;

        let audio_file = output.unwrap_or_else(|| default_output_path(language));
        save_speech(&audio, &audio_file)?;

        Ok(SpeechOutput {
            audio_file,
            summary_text,
            language,
        })
    }
}

/// Where audio goes when no output path is given
pub fn default_output_path(language: Language) -> PathBuf {
    std::env::temp_dir().join(format!("speech_{}.mp3", language.code()))
}

pub fn save_speech(audio: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, audio)
        .with_context(|| format!("Failed to write audio file: {}", path.display()))
}

pub fn tts_request_url(base: &str, chunk: &str, language: Language, idx: usize, total: usize) -> String {
    format!(
        "{}?ie=UTF-8&client=tw-ob&tl={}&total={}&idx={}&textlen={}&q={}",
        base,
        language.code(),
        total,
        idx,
        chunk.chars().count(),
        urlencoding::encode(chunk)
    )
}

/// Split text into chunks of at most `max_chars` characters on word
/// boundaries. Whitespace is normalised; a word longer than the limit is cut.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
