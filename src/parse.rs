use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::{Error, Result};

/// One scraped quote and who said it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

/// Everything pulled out of a single listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct QuotePage {
    pub quotes: Vec<Quote>,
    /// Absolute url of the "Next" link, if the page has one.
    pub next: Option<Url>,
}

/// Attempts to parse the page, extracting every `<div class="quote">` block.
/// Blocks without both a text and an author are skipped.
pub(crate) async fn parse_quotes(html: String, page_url: &str) -> Result<QuotePage> {
    let base = Url::parse(page_url).map_err(|_| Error::InvalidUrl(page_url.into()))?;

    let page = spawn_blocking(move || -> Result<QuotePage> {
        let doc = Html::parse_document(&html);

        // Create selectors.
        let quote_selector = create_selector("div.quote")?;
        let text_selector = create_selector("span.text")?;
        let author_selector = create_selector("small.author")?;
        let next_selector = create_selector("li.next > a")?;

        // The listing shows ten quotes per page.
        let mut quotes = Vec::with_capacity(10);
        for block in doc.select(&quote_selector) {
            let text = block.select(&text_selector).next().map(stripped_text);
            let author = block.select(&author_selector).next().map(stripped_text);
            if let (Some(text), Some(author)) = (text, author) {
                quotes.push(Quote { text, author });
            }
        }

        let next = match doc
            .select(&next_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => Some(base.join(href).map_err(|_| Error::InvalidUrl(href.into()))?),
            None => None,
        };

        Ok(QuotePage { quotes, next })
    })
    .await??;

    Ok(page)
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// All text nodes under `el`, joined, with surrounding whitespace removed.
#[inline]
fn stripped_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
