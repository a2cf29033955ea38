use crate::core::failure::{Failure, bounded};
use crate::core::video_id::{VideoId, resolve};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use yt_transcript_rs::api::YouTubeTranscriptApi;

pub const MISSING_URL: &str = "Please enter a video URL";

/// One timed line of a transcript, in the order the service returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Segment texts joined by newlines, untouched otherwise.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn timestamped_lines(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|segment| {
                let start = format_timestamp(segment.start);
                let end = format_timestamp(segment.start + segment.duration);
                format!("[{start} - {end}] {}", segment.text)
            })
            .collect()
    }
}

pub trait TranscriptSource: Send + Sync {
    fn fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> impl Future<Output = Result<Vec<TranscriptSegment>>> + Send;
}

#[derive(Clone)]
pub struct YouTubeTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YouTubeTranscriptSource {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::custom(format!("Failed to set up transcript client: {e}")))?;
        Ok(Self { api })
    }
}

impl TranscriptSource for YouTubeTranscriptSource {
    async fn fetch(&self, video_id: &VideoId, languages: &[String]) -> Result<Vec<TranscriptSegment>> {
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

        let transcript = self
            .api
            .fetch_transcript(video_id.as_str(), &languages, false)
            .await
            .map_err(|e| Error::custom(format!("Failed to fetch transcript: {e}")))?;

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| TranscriptSegment {
                text: snippet.text,
                start: snippet.start,
                duration: snippet.duration,
            })
            .collect())
    }
}

pub struct TranscriptSession<S> {
    source: S,
    languages: Vec<String>,
    timeout: Option<Duration>,
}

impl<S: TranscriptSource> TranscriptSession<S> {
    pub fn new(source: S, languages: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            source,
            languages,
            timeout,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn download(&self, url_or_id: &str) -> std::result::Result<Transcript, Failure> {
        if url_or_id.trim().is_empty() {
            return Err(Failure::EmptyInput(MISSING_URL));
        }

        let video_id = resolve(url_or_id.trim());
        tracing::info!(%video_id, "Fetching transcript");

        let segments = bounded(self.timeout, self.source.fetch(&video_id, &self.languages))
            .await
            .inspect_err(|e| tracing::error!(error = %e, %video_id, "Transcript download failed"))?;

        tracing::info!(%video_id, segments = segments.len(), "Transcript downloaded");

        Ok(Transcript {
            video_id: video_id.to_string(),
            segments,
        })
    }
}

fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1_000;
    let millis = total_millis % 1_000;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
    } else {
        format!("{minutes:02}:{secs:02}.{millis:03}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stubs::{StubSource, segment};

    fn session(source: StubSource) -> TranscriptSession<StubSource> {
        TranscriptSession::new(source, vec!["en".into()], None)
    }

    #[tokio::test]
    async fn empty_input_skips_the_service() {
        let source = StubSource::returning(vec![segment("Hello")]);
        let calls = source.calls.clone();

        let result = session(source).download("").await;

        assert_eq!(result, Err(Failure::EmptyInput(MISSING_URL)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn segments_join_with_newlines() {
        let source = StubSource::returning(vec![segment("Hello"), segment("world")]);
        let calls = source.calls.clone();

        let transcript = session(source)
            .download("https://youtube.com/watch?v=abc123&t=10")
            .await
            .expect("transcript");

        assert_eq!(transcript.text(), "Hello\nworld");
        assert_eq!(transcript.video_id, "abc123");
        assert_eq!(*calls.lock().unwrap(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn text_is_not_trimmed_or_deduplicated() {
        let source = StubSource::returning(vec![segment("  a "), segment("  a "), segment("b")]);

        let transcript = session(source).download("id").await.expect("transcript");

        assert_eq!(transcript.text(), "  a \n  a \nb");
    }

    #[tokio::test]
    async fn service_failure_becomes_a_description() {
        let source = StubSource::failing("Transcripts are disabled for this video");

        let result = session(source).download("dQw4w9WgXcQ").await;

        assert_eq!(
            result,
            Err(Failure::Service(
                "Transcripts are disabled for this video".into()
            ))
        );
    }

    #[test]
    fn timestamps_format_minutes_and_hours() {
        assert_eq!(format_timestamp(65.25), "01:05.250");
        assert_eq!(format_timestamp(3723.0), "01:02:03.000");
    }

    #[test]
    fn timestamped_lines_cover_each_segment() {
        let transcript = Transcript {
            video_id: "x".into(),
            segments: vec![TranscriptSegment {
                text: "hi".into(),
                start: 1.0,
                duration: 2.5,
            }],
        };
        assert_eq!(transcript.timestamped_lines(), vec!["[00:01.000 - 00:03.500] hi"]);
    }
}
