//! Dictionary oracle for word validation
//!
//! Two interchangeable backings behind one capability trait: an exact
//! local word list, and an online lookup against sjp.pl with a
//! per-process cache and fail-open behavior on network errors so a
//! flaky connection never blocks play.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Answers "is this string a valid word", and optionally provides a
/// definition for display. The move engine and the AI search depend on
/// this capability only, never on a concrete backing.
pub trait Dictionary: Send + Sync {
    fn is_word(&self, word: &str) -> bool;

    /// Best-effort definition text; `None` when the backing has none.
    fn definition(&self, _word: &str) -> Option<String> {
        None
    }
}

/// Exact-membership lookup over a word list held in memory.
pub struct LocalDictionary {
    words: HashSet<String>,
}

impl LocalDictionary {
    /// Build from any word iterator; input is uppercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_uppercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load a plain-text word list, one word per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_words(contents.lines()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for LocalDictionary {
    fn is_word(&self, word: &str) -> bool {
        !word.is_empty() && self.words.contains(&word.to_uppercase())
    }
}

/// Base URL of the public word lookup service.
const SJP_URL: &str = "https://sjp.pl";

/// Request timeout; a slow lookup must not stall the turn owner.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Markers scanned for in the (lowercased) response body.
const POSITIVE_MARKERS: [&str; 3] = ["dopuszczalne w grach", "hasło", "znaczenie"];
const NEGATIVE_MARKERS: [&str; 2] = ["nie występuje w słowniku", "nie znaleziono"];

/// Definition fragment boundaries within the tag-stripped page text.
const DEFINITION_START: &str = "dopuszczalne w grach";
const DEFINITION_END: &str = "komentarz";
const DEFINITION_MAX_CHARS: usize = 400;

/// Online lookup against sjp.pl. Verdicts are cached per process, keyed
/// by the uppercased word; any transport error is treated as valid
/// (fail-open) so the game keeps moving offline.
pub struct SjpDictionary {
    client: reqwest::blocking::Client,
    cache: Mutex<HashMap<String, bool>>,
}

impl SjpDictionary {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn fetch_page(&self, word: &str) -> reqwest::Result<String> {
        let url = format!("{SJP_URL}/{}", word.to_lowercase());
        self.client.get(&url).send()?.text()
    }

    fn cached(&self, key: &str) -> Option<bool> {
        self.cache.lock().ok().and_then(|c| c.get(key).copied())
    }

    fn store(&self, key: String, verdict: bool) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, verdict);
        }
    }
}

impl Default for SjpDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for SjpDictionary {
    fn is_word(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let key = word.to_uppercase();
        if let Some(verdict) = self.cached(&key) {
            return verdict;
        }
        let verdict = match self.fetch_page(word) {
            Ok(body) => {
                let body = body.to_lowercase();
                let positive = POSITIVE_MARKERS.iter().any(|m| body.contains(m));
                let negative = NEGATIVE_MARKERS.iter().any(|m| body.contains(m));
                positive && !negative
            }
            Err(err) => {
                // Fail-open: an unreachable dictionary must not block play.
                log::warn!("sjp.pl lookup for '{word}' failed ({err}); accepting the word");
                true
            }
        };
        self.store(key, verdict);
        verdict
    }

    fn definition(&self, word: &str) -> Option<String> {
        let body = self.fetch_page(word).ok()?;
        let text = unescape(&strip_tags(&body));
        let start = text.find(DEFINITION_START)? + DEFINITION_START.len();
        let rest = &text[start..];
        let end = rest.find(DEFINITION_END).unwrap_or(rest.len());
        let fragment = rest[..end]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if fragment.is_empty() {
            return None;
        }
        if fragment.chars().count() > DEFINITION_MAX_CHARS {
            let mut clipped: String = fragment.chars().take(DEFINITION_MAX_CHARS).collect();
            clipped.push_str("...");
            Some(clipped)
        } else {
            Some(fragment)
        }
    }
}

/// Drop everything between `<` and `>`, replacing each tag with a space
/// so adjacent text does not run together.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Resolve the handful of HTML entities the lookup pages actually use.
fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_lookup_is_case_insensitive() {
        let dict = LocalDictionary::from_words(["kot", "Dom"]);
        assert!(dict.is_word("KOT"));
        assert!(dict.is_word("kot"));
        assert!(dict.is_word("dom"));
        assert!(!dict.is_word("pies"));
        assert!(!dict.is_word(""));
    }

    #[test]
    fn local_lookup_handles_polish_letters() {
        let dict = LocalDictionary::from_words(["żółw"]);
        assert!(dict.is_word("ŻÓŁW"));
    }

    #[test]
    fn from_words_skips_blank_lines() {
        let dict = LocalDictionary::from_words(["kot", "", "  "]);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(
            strip_tags("<p>dopuszczalne <b>w</b> grach</p>")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            "dopuszczalne w grach"
        );
    }

    #[test]
    fn unescape_resolves_common_entities() {
        assert_eq!(unescape("a&amp;b&nbsp;&quot;c&quot;"), "a&b \"c\"");
    }
}
