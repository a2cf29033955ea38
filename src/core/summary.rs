use crate::core::completion::{ChatMessage, CompletionClient, Completer};
use crate::core::failure::Failure;

pub const SUMMARY_TEMPERATURE: f32 = 0.3;
pub const SUMMARY_LABEL: &str = "Summary:";
pub const NOTHING_TO_SUMMARIZE: &str = "No transcript to summarize";
const BOLD_DELIMITER: &str = "**";

fn summary_prompt(transcript: &str) -> String {
    format!("Summarize this transcript in clear bullet points:\n\n{transcript}")
}

/// A run of text sharing one emphasis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub bold: bool,
}

impl Fragment {
    fn new(text: impl Into<String>, bold: bool) -> Self {
        Self {
            text: text.into(),
            bold,
        }
    }
}

pub type StyledLine = Vec<Fragment>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    raw: String,
}

impl Summary {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Model output exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The bold label line followed by the summary body.
    pub fn lines(&self) -> Vec<StyledLine> {
        let mut lines = vec![vec![Fragment::new(SUMMARY_LABEL, true)]];
        lines.extend(emphasize(&self.raw));
        lines
    }

    /// What the display shows, minus the emphasis markers.
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|line| line.iter().map(|f| f.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_html(&self) -> String {
        self.lines()
            .iter()
            .map(|line| {
                line.iter()
                    .map(|fragment| {
                        let text = html_escape::encode_text(&fragment.text);
                        if fragment.bold {
                            format!("<b>{text}</b>")
                        } else {
                            text.into_owned()
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

/// Split `text` into lines of fragments, pairing `**` delimiters left to
/// right: odd occurrences open bold, even ones close it. A trailing
/// delimiter with no partner is kept as literal text.
pub fn emphasize(text: &str) -> Vec<StyledLine> {
    let pieces: Vec<&str> = text.split(BOLD_DELIMITER).collect();
    let delimiters = pieces.len() - 1;

    let mut runs: Vec<Fragment> = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.iter().enumerate() {
        let opened = i % 2 == 1;
        if opened && i < delimiters {
            runs.push(Fragment::new(*piece, true));
        } else if opened {
            runs.push(Fragment::new(format!("{BOLD_DELIMITER}{piece}"), false));
        } else {
            runs.push(Fragment::new(*piece, false));
        }
    }

    let mut lines: Vec<StyledLine> = vec![Vec::new()];
    for run in runs {
        for (n, part) in run.text.split('\n').enumerate() {
            if n > 0 {
                lines.push(Vec::new());
            }
            if part.is_empty() {
                continue;
            }
            let Some(line) = lines.last_mut() else {
                continue;
            };
            match line.last_mut() {
                Some(prev) if prev.bold == run.bold => prev.text.push_str(part),
                _ => line.push(Fragment::new(part, run.bold)),
            }
        }
    }

    lines
}

/// One-shot summary of `transcript`.
pub async fn summarize<C: CompletionClient>(
    completer: &Completer<C>,
    transcript: &str,
) -> Result<Summary, Failure> {
    if transcript.is_empty() {
        return Err(Failure::EmptyInput(NOTHING_TO_SUMMARIZE));
    }

    tracing::info!(model = completer.model(), chars = transcript.len(), "Summarizing transcript");

    let content = completer
        .complete(
            SUMMARY_TEMPERATURE,
            vec![ChatMessage::user(summary_prompt(transcript))],
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Summarization failed"))?;

    let summary = Summary::new(content);
    tracing::info!(chars = summary.raw().len(), "Summary received");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::Role;
    use crate::core::stubs::StubCompletion;

    fn plain(text: &str) -> Fragment {
        Fragment::new(text, false)
    }

    fn bold(text: &str) -> Fragment {
        Fragment::new(text, true)
    }

    #[test]
    fn bold_delimiters_alternate() {
        assert_eq!(
            emphasize("A **bold** word"),
            vec![vec![plain("A "), bold("bold"), plain(" word")]]
        );
    }

    #[test]
    fn several_bold_runs_on_one_line() {
        assert_eq!(
            emphasize("**a** and **b**"),
            vec![vec![bold("a"), plain(" and "), bold("b")]]
        );
    }

    #[test]
    fn unpaired_delimiter_stays_literal() {
        assert_eq!(
            emphasize("**x** then **y"),
            vec![vec![bold("x"), plain(" then **y")]]
        );
    }

    #[test]
    fn newlines_become_lines_and_bold_spans_them() {
        assert_eq!(
            emphasize("- **Key\npoint** done\n- next"),
            vec![
                vec![plain("- "), bold("Key")],
                vec![bold("point"), plain(" done")],
                vec![plain("- next")],
            ]
        );
    }

    #[test]
    fn html_pairs_tags_and_escapes_text() {
        let summary = Summary::new("A **bold** <word>\n- item");
        assert_eq!(
            summary.to_html(),
            "<b>Summary:</b><br>A <b>bold</b> &lt;word&gt;<br>- item"
        );
    }

    #[test]
    fn plain_text_drops_markers_and_keeps_label() {
        let summary = Summary::new("A **bold** word");
        assert_eq!(summary.plain_text(), "Summary:\nA bold word");
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected_without_a_call() {
        let stub = StubCompletion::replying(vec![Ok("unused")]);
        let completer = Completer::new(stub.clone(), "test-model", None);

        let result = summarize(&completer, "").await;

        assert_eq!(result, Err(Failure::EmptyInput(NOTHING_TO_SUMMARIZE)));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn sends_one_low_temperature_user_message() {
        let stub = StubCompletion::replying(vec![Ok("A **bold** word")]);
        let completer = Completer::new(stub.clone(), "test-model", None);

        let summary = summarize(&completer, "Hello\nworld").await.expect("summary");

        assert_eq!(summary.raw(), "A **bold** word");
        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].temperature, SUMMARY_TEMPERATURE);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::User);
        assert_eq!(
            requests[0].messages[0].content,
            "Summarize this transcript in clear bullet points:\n\nHello\nworld"
        );
    }

    #[tokio::test]
    async fn service_failure_is_reported() {
        let stub = StubCompletion::replying(vec![Err("401 invalid api key")]);
        let completer = Completer::new(stub, "test-model", None);

        let result = summarize(&completer, "text").await;

        assert_eq!(result, Err(Failure::Service("401 invalid api key".into())));
    }
}
