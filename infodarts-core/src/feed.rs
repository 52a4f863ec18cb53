use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::{Article, Feed, Routine};

/// Characters left alone by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const ARTICLE_PAGE: &str = "articulo.html";
pub const ROUTINE_PAGE: &str = "rutina.html";

#[derive(Debug, Error)]
#[error("malformed content feed: {0}")]
pub struct FeedError(#[from] serde_json::Error);

pub fn parse_feed<B: AsRef<[u8]>>(bytes: B) -> Result<Feed, FeedError> {
    Ok(serde_json::from_slice(bytes.as_ref())?)
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, COMPONENT).to_string()
}

impl Article {
    #[must_use]
    pub fn link(&self) -> String {
        format!(
            "{ARTICLE_PAGE}?docx={}&title={}",
            encode(self.docx.as_deref().unwrap_or_default()),
            encode(&self.title)
        )
    }
}

impl Routine {
    #[must_use]
    pub fn link(&self) -> String {
        format!(
            "{ROUTINE_PAGE}?title={}&image={}",
            encode(&self.title),
            encode(self.image.as_deref().unwrap_or_default())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_feed() {
        let feed = parse_feed(
            r#"{
                "articles": [
                    {"title": "Grip", "summary": "Hold it", "image": "img/grip.jpg", "docx": "docs/grip.docx"},
                    {"title": "Grip", "docx": "docs/grip-2.docx"}
                ],
                "rutinas": [{"title": "Bob's 27", "image": "img/bob.png"}]
            }"#,
        )
        .unwrap();

        assert_eq!(feed.articles.len(), 2);
        assert_eq!(feed.articles[0].summary.as_deref(), Some("Hold it"));
        assert_eq!(feed.articles[1].image, None);
        assert_eq!(feed.routines[0].title, "Bob's 27");
    }

    #[test]
    fn test_missing_collections_default_empty() {
        let feed = parse_feed("{}").unwrap();
        assert!(feed.articles.is_empty());
        assert!(feed.routines.is_empty());

        let feed = parse_feed(r#"{"rutinas": [{"title": "Doubles"}]}"#).unwrap();
        assert!(feed.articles.is_empty());
        assert_eq!(feed.routines.len(), 1);
    }

    #[test]
    fn test_malformed_feed() {
        assert!(parse_feed("{\"articles\": [").is_err());
        assert!(parse_feed("<html>404</html>").is_err());
        assert!(parse_feed(r#"{"articles": {}}"#).is_err());
    }

    #[test]
    fn test_article_link_encodes_components() {
        let article = Article {
            title: "Checkout 170? Yes & no".into(),
            docx: Some("docs/170 guía.docx".into()),
            ..Default::default()
        };
        assert_eq!(
            article.link(),
            "articulo.html?docx=docs%2F170%20gu%C3%ADa.docx&title=Checkout%20170%3F%20Yes%20%26%20no"
        );
    }

    #[test]
    fn test_routine_link_keeps_unreserved() {
        let routine = Routine {
            title: "Bob's 27 (v2)!".into(),
            image: Some("img/a_b-c.d~e*.png".into()),
            ..Default::default()
        };
        assert_eq!(
            routine.link(),
            "rutina.html?title=Bob's%2027%20(v2)!&image=img%2Fa_b-c.d~e*.png"
        );
    }
}
