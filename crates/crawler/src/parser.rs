use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

/// Class tokens that mark an anchor as a link to a song page. The chart has
/// used two row styles over time (`song-link hasvidtoplyric` on the primary
/// chart rows, `title hasvidtoplyriclist` on the secondary listing); one
/// predicate has to capture both. These tokens are a contract with the
/// upstream page format.
pub const SONG_LINK_CLASSES: [&str; 2] = ["song-link", "title"];

/// Class token marking an element that holds a portion of lyric text.
pub const VERSE_CLASS: &str = "verse";

/// A parsed HTML page plus the URL it was fetched from, for resolving
/// relative links.
pub struct PageDocument {
    html: Html,
    base_url: Url,
}

impl PageDocument {
    pub fn parse(bytes: &[u8], base_url: Url) -> Self {
        let html = Html::parse_document(&String::from_utf8_lossy(bytes));
        Self { html, base_url }
    }

    /// Every element matching `classifier`, in document order.
    pub fn elements_where<'a, F>(&'a self, classifier: F) -> Vec<ElementRef<'a>>
    where
        F: Fn(&ElementRef<'a>) -> bool,
    {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| classifier(el))
            .collect()
    }

    /// `href` targets of every anchor matching `classifier`, resolved
    /// against the page URL, in document order. Duplicates are kept.
    pub fn links_where<F>(&self, classifier: F) -> Vec<Url>
    where
        F: for<'a> Fn(&ElementRef<'a>) -> bool,
    {
        let mut links = Vec::new();
        for el in self.elements_where(classifier) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            match self.base_url.join(href) {
                Ok(url) => links.push(url),
                Err(e) => debug!("skipping unparseable href {:?}: {}", href, e),
            }
        }
        links
    }

    /// Text of the first top-level heading element, if any.
    pub fn first_heading(&self) -> Option<String> {
        self.elements_where(|el| el.value().name() == "h1")
            .first()
            .map(|el| el.text().collect())
    }

    /// The whole page's text content with whitespace collapsed to single
    /// spaces, for phrase matching across markup boundaries.
    pub fn normalized_text(&self) -> String {
        let text: String = self.html.root_element().text().collect();
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// True for anchors the chart marks as song-page links: a hyperlink (`href`
/// present) whose class list contains one of `SONG_LINK_CLASSES`.
pub fn is_song_link(el: &ElementRef) -> bool {
    el.value().name() == "a"
        && el.value().attr("href").is_some()
        && el.value().classes().any(|class| SONG_LINK_CLASSES.contains(&class))
}

/// True for elements whose class list tags them as a verse block.
pub fn is_verse_block(el: &ElementRef) -> bool {
    el.value().classes().any(|class| class == VERSE_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> PageDocument {
        PageDocument::parse(html.as_bytes(), Url::parse("http://www.metrolyrics.com/top100.html").unwrap())
    }

    #[test]
    fn test_both_link_styles_match_in_document_order() {
        let page = doc(r#"
            <html><body>
                <a class="song-link hasvidtoplyric" href="first-lyrics.html">First</a>
                <a class="artist" href="artist.html">Not a song</a>
                <a class="title hasvidtoplyriclist" href="second-lyrics.html">Second</a>
            </body></html>
        "#);

        let links = page.links_where(is_song_link);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].path(), "/first-lyrics.html");
        assert_eq!(links[1].path(), "/second-lyrics.html");
    }

    #[test]
    fn test_anchor_without_href_does_not_qualify() {
        let page = doc(r#"<a class="song-link">no target</a>"#);
        assert!(page.links_where(is_song_link).is_empty());
    }

    #[test]
    fn test_duplicate_links_are_kept() {
        let page = doc(r#"
            <a class="song-link" href="song-lyrics.html">a</a>
            <a class="title" href="song-lyrics.html">b</a>
        "#);
        assert_eq!(page.links_where(is_song_link).len(), 2);
    }

    #[test]
    fn test_absolute_hrefs_survive_resolution() {
        let page = doc(r#"<a class="song-link" href="http://www.metrolyrics.com/other-lyrics.html">x</a>"#);
        let links = page.links_where(is_song_link);
        assert_eq!(links[0].as_str(), "http://www.metrolyrics.com/other-lyrics.html");
    }

    #[test]
    fn test_first_heading() {
        let page = doc("<h1>Some Song Lyrics</h1><h1>Second Heading</h1>");
        assert_eq!(page.first_heading().as_deref(), Some("Some Song Lyrics"));

        let headingless = doc("<p>no headings here</p>");
        assert_eq!(headingless.first_heading(), None);
    }

    #[test]
    fn test_verse_classifier() {
        let page = doc(r#"
            <p class="verse">one</p>
            <p class="chorus">skip</p>
            <div class="verse">two</div>
        "#);
        let verses = page.elements_where(is_verse_block);
        assert_eq!(verses.len(), 2);
        let text: String = verses.iter().flat_map(|el| el.text()).collect();
        assert_eq!(text, "onetwo");
    }

    #[test]
    fn test_normalized_text_collapses_markup_whitespace() {
        let page = doc("<p>Unfortunately, we are\n   not <b>authorized</b></p>");
        assert_eq!(page.normalized_text(), "Unfortunately, we are not authorized");
    }
}
