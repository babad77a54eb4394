//! Last path segment of a URL.

use url::Url;

/// Returns the text after the final `/` of the URL path, ignoring query and fragment.
///
/// `None` when that text is empty: a root path or a trailing slash.
pub fn last_path_segment(url: &Url) -> Option<&str> {
    url.path().rsplit('/').next().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(s: &str) -> Option<String> {
        let url = Url::parse(s).unwrap();
        last_path_segment(&url).map(str::to_string)
    }

    #[test]
    fn normal() {
        assert_eq!(seg("https://i.imgur.com/a/b/cat.png").as_deref(), Some("cat.png"));
        assert_eq!(seg("https://i.imgur.com/single").as_deref(), Some("single"));
    }

    #[test]
    fn trailing_slash_has_no_segment() {
        assert_eq!(seg("https://i.imgur.com/dir/cat.gif/"), None);
        assert_eq!(seg("https://i.imgur.com/cat.png//"), None);
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(seg("https://i.imgur.com/"), None);
        assert_eq!(seg("https://i.imgur.com"), None);
    }

    #[test]
    fn query_and_fragment_ignored() {
        assert_eq!(
            seg("https://i.imgur.com/cat.jpeg?size=large#top").as_deref(),
            Some("cat.jpeg")
        );
    }
}
