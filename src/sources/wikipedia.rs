//! Text-corpus adapter: mines article sections for cultural points of
//! interest.
//!
//! The encyclopedia provides no per-item geometry, so every candidate
//! inherits the zone center and is marked `approximate_location = true`.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{SourceError, SourceResult};
use crate::limiter::SharedRateLimiter;
use crate::sources::{http_client, parse_endpoint, send_with_retry};
use crate::traits::source::PoiSource;
use crate::types::{
    candidate::{RawCandidate, Source},
    zone::ZoneDescriptor,
};

/// Default MediaWiki API endpoint.
const DEFAULT_API_BASE: &str = "https://en.wikipedia.org/w/api.php";

/// Headings worth mining for points of cultural interest.
const DEFAULT_SECTION_KEYWORDS: &[&str] = &[
    "places of interest",
    "points of interest",
    "main sights",
    "sights",
    "landmarks",
    "monuments",
    "attractions",
    "architecture",
    "culture",
];

/// Hard cap on the name-extraction fallback.
const FALLBACK_NAME_CHARS: usize = 80;

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsePayload>,
}

#[derive(Debug, Deserialize)]
struct ParsePayload {
    wikitext: WikitextWrapper,
}

#[derive(Debug, Deserialize)]
struct WikitextWrapper {
    #[serde(rename = "*")]
    content: String,
}

/// Encyclopedia-text source adapter.
pub struct WikipediaSource {
    client: reqwest::Client,
    limiter: SharedRateLimiter,
    api_base: String,
    section_keywords: Vec<String>,
}

impl WikipediaSource {
    /// Create an adapter sharing the given rate limiter.
    pub fn new(limiter: SharedRateLimiter) -> Self {
        Self {
            client: http_client(),
            limiter,
            api_base: DEFAULT_API_BASE.to_string(),
            section_keywords: DEFAULT_SECTION_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Point at a different MediaWiki API endpoint (language editions,
    /// test servers).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Replace the section keyword list.
    pub fn with_section_keywords(
        mut self,
        keywords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.section_keywords = keywords.into_iter().map(|k| k.into()).collect();
        self
    }

    /// Ordered list of article titles to try for this zone.
    fn name_variants(zone: &ZoneDescriptor) -> Vec<String> {
        let mut variants = Vec::new();
        if let Some(hint) = &zone.location_hint {
            variants.push(hint.clone());
        }
        if !variants.iter().any(|v| v == &zone.name) {
            variants.push(zone.name.clone());
        }
        if let Some(hint) = &zone.location_hint {
            if hint != &zone.name {
                variants.push(format!("{}, {}", zone.name, hint));
            }
        }
        variants
    }

    /// Resolve the first article that exists among the name variants.
    async fn resolve_article(&self, zone: &ZoneDescriptor) -> SourceResult<String> {
        for title in Self::name_variants(zone) {
            match self.fetch_wikitext(&title).await {
                Ok(Some(wikitext)) => {
                    debug!(title = %title, "resolved article");
                    return Ok(wikitext);
                }
                Ok(None) => {
                    debug!(title = %title, "no article for variant");
                }
                Err(e) => return Err(e),
            }
        }
        Err(SourceError::DocumentNotFound {
            name: zone.name.clone(),
        })
    }

    /// Fetch an article's wikitext, `None` when the title does not exist.
    async fn fetch_wikitext(&self, title: &str) -> SourceResult<Option<String>> {
        let endpoint = parse_endpoint(&self.api_base)?;
        let response = send_with_retry(&self.limiter, Source::Wikipedia, || {
            self.client.get(endpoint.clone()).query(&[
                ("action", "parse"),
                ("prop", "wikitext"),
                ("format", "json"),
                ("redirects", "1"),
                ("page", title),
            ])
        })
        .await?;

        let parsed: ParseResponse =
            response
                .json()
                .await
                .map_err(|e| SourceError::MalformedResponse {
                    endpoint: self.api_base.clone(),
                    reason: e.to_string(),
                })?;

        // A missing page comes back as an error object without `parse`.
        Ok(parsed.parse.map(|p| p.wikitext.content))
    }

    /// Extract candidates from every section whose heading matches the
    /// keyword list.
    fn mine_sections(&self, wikitext: &str, zone: &ZoneDescriptor) -> Vec<RawCandidate> {
        let mut candidates = Vec::new();
        let center = zone.center();

        for (heading, body) in split_sections(wikitext) {
            let heading_lower = heading.to_lowercase();
            if !self
                .section_keywords
                .iter()
                .any(|k| heading_lower.contains(k.as_str()))
            {
                continue;
            }

            for item in list_items(&body) {
                let text = strip_wiki_markup(&item);
                if text.trim().is_empty() {
                    continue;
                }
                let (name, description) = split_name_description(&text);
                candidates.push(
                    RawCandidate::new(name, Source::Wikipedia)
                        .with_description(description)
                        .with_approximate_coordinates(center),
                );
            }
        }

        candidates
    }
}

#[async_trait]
impl PoiSource for WikipediaSource {
    fn source(&self) -> Source {
        Source::Wikipedia
    }

    async fn fetch(&self, zone: &ZoneDescriptor) -> Vec<RawCandidate> {
        match self.resolve_article(zone).await {
            Ok(wikitext) => {
                let candidates = self.mine_sections(&wikitext, zone);
                info!(
                    zone = %zone.name,
                    count = candidates.len(),
                    "text corpus candidates extracted"
                );
                candidates
            }
            Err(e) => {
                warn!(zone = %zone.name, error = %e, "text corpus fetch failed, yielding nothing");
                Vec::new()
            }
        }
    }
}

/// Split wikitext into (heading, body) sections. Text before the first
/// heading is skipped: lead paragraphs name the place, not its sights.
fn split_sections(wikitext: &str) -> Vec<(String, String)> {
    let heading_re = Regex::new(r"(?m)^(={2,4})\s*(.+?)\s*={2,4}\s*$").unwrap();

    let mut sections = Vec::new();
    let mut last_heading: Option<String> = None;
    let mut last_end = 0usize;

    for m in heading_re.captures_iter(wikitext) {
        let whole = m.get(0).unwrap();
        if let Some(heading) = last_heading.take() {
            sections.push((heading, wikitext[last_end..whole.start()].to_string()));
        }
        last_heading = Some(m[2].to_string());
        last_end = whole.end();
    }
    if let Some(heading) = last_heading {
        sections.push((heading, wikitext[last_end..].to_string()));
    }
    sections
}

/// Collect `*` list items from a section body.
fn list_items(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            trimmed
                .strip_prefix('*')
                .map(|rest| rest.trim_start_matches('*').trim().to_string())
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Strip the wiki markup that matters for list items: links, bold/italic
/// quotes, templates, and reference tags.
fn strip_wiki_markup(text: &str) -> String {
    // [[target|label]] -> label, [[target]] -> target
    let link_re = Regex::new(r"\[\[(?:[^\]|]*\|)?([^\]]*)\]\]").unwrap();
    let template_re = Regex::new(r"\{\{[^}]*\}\}").unwrap();
    let ref_re = Regex::new(r"(?s)<ref[^>]*>.*?</ref>|<ref[^>]*/>").unwrap();

    let text = ref_re.replace_all(text, "");
    let text = template_re.replace_all(&text, "");
    let text = link_re.replace_all(&text, "$1");
    text.replace("'''", "").replace("''", "").trim().to_string()
}

/// Split a list item into (name, description).
///
/// Three strategies in order: first structural separator (colon, dash,
/// bullet, period), first short sentence, first 80 characters. Non-empty
/// input always yields a name.
fn split_name_description(text: &str) -> (String, String) {
    // 1. Structural separator.
    for sep in [':', '–', '—', '-', '•'] {
        if let Some(idx) = text.find(sep) {
            let name = text[..idx].trim();
            // A separator in the first couple of characters is list noise,
            // not a name boundary.
            if name.chars().count() >= 3 {
                let description = text[idx + sep.len_utf8()..].trim();
                return (name.to_string(), description.to_string());
            }
        }
    }

    // Period needs care: avoid splitting abbreviations like "S. Giorgio".
    if let Some(idx) = text.find(". ") {
        let name = text[..idx].trim();
        if name.chars().count() >= 3 {
            return (name.to_string(), text[idx + 2..].trim().to_string());
        }
    }

    // 2. First short sentence.
    let first_sentence = text.split('.').next().unwrap_or(text).trim();
    if (3..=60).contains(&first_sentence.chars().count()) {
        let rest = text[first_sentence.len()..]
            .trim_start_matches('.')
            .trim();
        return (first_sentence.to_string(), rest.to_string());
    }

    // 3. First N characters.
    let name: String = text.chars().take(FALLBACK_NAME_CHARS).collect();
    (name, text.to_string())
}
