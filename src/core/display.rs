use crate::core::summary::{Fragment, StyledLine, Summary};
use crate::core::transcript::Transcript;

/// What the shared display surface currently holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DisplayContent {
    #[default]
    Empty,
    Transcript(Transcript),
    Summary(Summary),
    /// Pasted or hand-edited text.
    Text(String),
    Error(String),
}

impl DisplayContent {
    pub fn plain_text(&self) -> String {
        match self {
            DisplayContent::Empty => String::new(),
            DisplayContent::Transcript(transcript) => transcript.text(),
            DisplayContent::Summary(summary) => summary.plain_text(),
            DisplayContent::Text(text) | DisplayContent::Error(text) => text.clone(),
        }
    }

    pub fn lines(&self) -> Vec<StyledLine> {
        match self {
            DisplayContent::Summary(summary) => summary.lines(),
            other => other
                .plain_text()
                .split('\n')
                .map(|line| {
                    vec![Fragment {
                        text: line.to_string(),
                        bold: false,
                    }]
                })
                .collect(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DisplayContent::Empty => "Display",
            DisplayContent::Transcript(_) => "Transcript",
            DisplayContent::Summary(_) => "Summary",
            DisplayContent::Text(_) => "Text",
            DisplayContent::Error(_) => "Error",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plain_text().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stubs::segment;

    #[test]
    fn transcript_shows_joined_text() {
        let content = DisplayContent::Transcript(Transcript {
            video_id: "id".into(),
            segments: vec![segment("Hello"), segment("world")],
        });
        assert_eq!(content.plain_text(), "Hello\nworld");
        assert_eq!(content.lines().len(), 2);
    }

    #[test]
    fn empty_and_error() {
        assert!(DisplayContent::Empty.is_empty());
        assert!(DisplayContent::Error(String::new()).is_empty());
        assert_eq!(
            DisplayContent::Error("Error: boom".into()).plain_text(),
            "Error: boom"
        );
    }

    #[test]
    fn edited_text_is_shown_verbatim() {
        let content = DisplayContent::Text("my **notes**\nsecond".into());
        assert_eq!(content.title(), "Text");
        assert_eq!(content.plain_text(), "my **notes**\nsecond");
        assert_eq!(content.lines().len(), 2);
        assert!(!content.lines()[0][0].bold);
    }

    #[test]
    fn summary_keeps_emphasis_in_lines() {
        let content = DisplayContent::Summary(Summary::new("A **b**"));
        let lines = content.lines();
        assert!(lines[0][0].bold);
        assert_eq!(lines[1][1].text, "b");
        assert!(lines[1][1].bold);
    }
}
