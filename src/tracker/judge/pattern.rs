extern crate regex;

use regex::Regex;

/// URL shapes the tracker reacts to.
pub struct RegexSet {
    slug: Regex,
    check: Regex,
    submit: Regex,
    origin: Regex,
}
impl RegexSet {
    pub fn new() -> Self {
        Self {
            slug: Regex::new(r"^https://[^/]+\.(com|cn)/problems/([a-zA-Z0-9-]+)/.*").unwrap(),
            check: Regex::new(r"^https://[^/]+/submissions/detail/[^/]+/check/?$").unwrap(),
            submit: Regex::new(r"^https://[^/]+/problems/[^/]+/submit/?$").unwrap(),
            origin: Regex::new(r"^https://([a-z0-9-]+\.)*leetcode\.(com|cn)(:[0-9]+)?(/.*)?$")
                .unwrap(),
        }
    }
    /// Problem slug of a problem page URL.
    pub fn slug<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.slug
            .captures(url)
            .and_then(|c| c.get(2))
            .map(|m| m.as_str())
    }
    pub fn is_check(&self, url: &str) -> bool {
        self.check.is_match(url)
    }
    pub fn is_submit(&self, url: &str) -> bool {
        self.submit.is_match(url)
    }
    /// Whether a request initiator is the judge's own site.
    pub fn is_judge_origin(&self, initiator: &str) -> bool {
        self.origin.is_match(initiator)
    }
}
impl Default for RegexSet {
    fn default() -> Self {
        Self::new()
    }
}
