//! In-memory stand-ins for the transcript and completion services.

use crate::core::completion::{CompletionClient, CompletionRequest};
use crate::core::transcript::{TranscriptSegment, TranscriptSource};
use crate::core::video_id::VideoId;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub fn segment(text: &str) -> TranscriptSegment {
    TranscriptSegment {
        text: text.to_string(),
        start: 0.0,
        duration: 1.0,
    }
}

#[derive(Clone, Default)]
pub struct StubSource {
    pub segments: Vec<TranscriptSegment>,
    pub fail_with: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl StubSource {
    pub fn returning(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl TranscriptSource for StubSource {
    async fn fetch(&self, video_id: &VideoId, _languages: &[String]) -> Result<Vec<TranscriptSegment>> {
        self.calls.lock().unwrap().push(video_id.to_string());
        match &self.fail_with {
            Some(message) => Err(Error::custom(message.clone())),
            None => Ok(self.segments.clone()),
        }
    }
}

/// Replies are popped in order; `Err` entries simulate a failing call.
/// Once the queue is empty every call fails.
#[derive(Clone, Default)]
pub struct StubCompletion {
    pub replies: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl StubCompletion {
    pub fn replying(replies: Vec<std::result::Result<&str, &str>>) -> Self {
        let replies = replies
            .into_iter()
            .map(|reply| reply.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionClient for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(Error::custom(message)),
            None => Err(Error::custom("no stubbed reply left")),
        }
    }
}
