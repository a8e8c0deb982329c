//! Field-level extraction rules.
//!
//! A [`Chain`] is an ordered list of selector attempts tried until one
//! yields a non-empty value, so the fallback order is data rather than
//! nested conditionals. [`Field`] keeps "missing" and "present but
//! unparseable" apart until the caller collapses it to a default.

use scraper::{ElementRef, Selector};

/// Compile a static selector.
///
/// Every call site passes a literal covered by the module tests, so a parse
/// failure here is a programming error.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Trimmed concatenated text of an element.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Where a rule reads its value from once the element is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Text,
    /// Text of every match, concatenated.
    AllText,
    Attr(&'static str),
}

/// One attempt: the `nth` element matching `selector` (or the scope element
/// itself when there is no selector), read via `source`.
#[derive(Debug, Clone)]
pub struct Rule {
    selector: Option<Selector>,
    nth: usize,
    source: Source,
}

impl Rule {
    fn apply(&self, scope: ElementRef<'_>) -> Option<String> {
        if self.source == Source::AllText {
            let joined: String = match &self.selector {
                Some(selector) => scope.select(selector).flat_map(|el| el.text()).collect(),
                None => scope.text().collect(),
            };
            return non_empty(&joined);
        }
        let element = match &self.selector {
            Some(selector) => scope.select(selector).nth(self.nth)?,
            None => scope,
        };
        match self.source {
            Source::Text | Source::AllText => non_empty(&text_of(element)),
            Source::Attr(name) => element.value().attr(name).and_then(non_empty),
        }
    }
}

/// Ordered fallback chain of [`Rule`]s.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    rules: Vec<Rule>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule reading the text of the first match.
    #[must_use]
    pub fn text(self, css: &'static str) -> Self {
        self.push(css, 0, Source::Text)
    }

    /// Append a rule reading the text of the `nth` (0-based) match.
    #[must_use]
    pub fn nth_text(self, css: &'static str, nth: usize) -> Self {
        self.push(css, nth, Source::Text)
    }

    /// Append a rule joining the text of every match.
    #[must_use]
    pub fn all_text(self, css: &'static str) -> Self {
        self.push(css, 0, Source::AllText)
    }

    /// Append a rule reading attribute `name` of the first match.
    #[must_use]
    pub fn attr(self, css: &'static str, name: &'static str) -> Self {
        self.push(css, 0, Source::Attr(name))
    }

    /// Append a rule reading attribute `name` of the scope element itself.
    #[must_use]
    pub fn own_attr(mut self, name: &'static str) -> Self {
        self.rules.push(Rule {
            selector: None,
            nth: 0,
            source: Source::Attr(name),
        });
        self
    }

    fn push(mut self, css: &'static str, nth: usize, source: Source) -> Self {
        self.rules.push(Rule {
            selector: Some(selector(css)),
            nth,
            source,
        });
        self
    }

    /// Value of the first rule that yields something.
    pub fn first_match(&self, scope: ElementRef<'_>) -> Option<String> {
        self.matched(scope).map(|(_, value)| value)
    }

    /// Like [`Chain::first_match`] but also reports which rule won.
    pub fn matched(&self, scope: ElementRef<'_>) -> Option<(usize, String)> {
        self.rules
            .iter()
            .enumerate()
            .find_map(|(i, rule)| rule.apply(scope).map(|value| (i, value)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Outcome of reading and parsing one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Nothing to parse.
    Absent,
    /// Raw text was present but did not parse.
    Unparseable(String),
    Present(T),
}

impl<T> Field<T> {
    /// Parse `raw` with `parse`; blank input counts as absent.
    pub fn parse_with<F>(raw: Option<&str>, parse: F) -> Self
    where
        F: FnOnce(&str) -> Option<T>,
    {
        match raw.map(str::trim).filter(|r| !r.is_empty()) {
            None => Self::Absent,
            Some(raw) => match parse(raw) {
                Some(value) => Self::Present(value),
                None => Self::Unparseable(raw.to_string()),
            },
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Unparseable(_) => None,
        }
    }

    pub fn or_default(self) -> T
    where
        T: Default,
    {
        self.ok().unwrap_or_default()
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Leading run of ASCII digits after optional whitespace, like `parseInt`
/// without sign handling: `"2021 "` → 2021, `"45m"` → 45, `"N/A"` → `None`.
pub fn leading_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    let raw = raw.trim_start();
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

/// Trailing hyphen segment of a slug (`movie/watch-dune-19722` → `19722`).
pub fn slug_id(slug: &str) -> String {
    slug.rsplit('-').next().unwrap_or(slug).to_string()
}
