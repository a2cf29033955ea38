use derive_more::Display;

/// Token the transcript service uses to address one video.
///
/// Only [`resolve`] produces these. No format checks are made here; a bad
/// token surfaces later as a transcript service failure.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Map a full URL, short link or bare identifier to a [`VideoId`].
///
/// Never fails: anything that does not look like a known URL shape is
/// returned verbatim.
pub fn resolve(input: &str) -> VideoId {
    if (input.starts_with("http://") || input.starts_with("https://"))
        && let Some((_, query)) = input.split_once("v=")
    {
        return VideoId(until_any(query, &['&']).to_string());
    }

    if let Some((_, path)) = input.split_once("youtu.be/") {
        return VideoId(until_any(path, &['&', '?']).to_string());
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        tracing::warn!(input, "URL has no v= parameter, using it as the video id");
    }

    VideoId(input.to_string())
}

fn until_any<'a>(s: &'a str, stops: &[char]) -> &'a str {
    s.split(stops).next().unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::resolve;

    #[test]
    fn watch_url_with_extra_params() {
        assert_eq!(
            resolve("https://youtube.com/watch?v=abc123&t=10").as_str(),
            "abc123"
        );
    }

    #[test]
    fn plain_http_watch_url() {
        assert_eq!(
            resolve("http://www.youtube.com/watch?v=dQw4w9WgXcQ").as_str(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn short_links() {
        assert_eq!(resolve("https://youtu.be/xyz789").as_str(), "xyz789");
        assert_eq!(resolve("youtu.be/xyz789&feature=share").as_str(), "xyz789");
        assert_eq!(resolve("https://youtu.be/xyz789?si=tracking").as_str(), "xyz789");
    }

    #[test]
    fn bare_identifier_passes_through() {
        assert_eq!(resolve("dQw4w9WgXcQ").as_str(), "dQw4w9WgXcQ");
        assert_eq!(resolve("not a url at all").as_str(), "not a url at all");
    }

    #[test]
    fn url_without_v_param_is_returned_unchanged() {
        let url = "https://www.youtube.com/shorts/abc";
        assert_eq!(resolve(url).as_str(), url);
    }

    #[test]
    fn v_param_must_come_from_an_http_url() {
        // Not an http(s) URL and no short link: identity.
        assert_eq!(resolve("v=abc").as_str(), "v=abc");
    }

    #[test]
    fn empty_v_value() {
        assert_eq!(resolve("https://youtube.com/watch?v=&t=1").as_str(), "");
    }
}
