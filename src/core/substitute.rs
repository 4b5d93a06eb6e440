//! Substitution engine — rewrites domain references in text.
//!
//! Three ordered passes, each operating on the output of the previous one:
//! 1. `http://OLD` / `https://OLD` → `https://NEW` (case-insensitive,
//!    always upgrades to https)
//! 2. protocol-relative `//OLD` → `//NEW` (case-insensitive, guarded by a
//!    negative lookbehind so URLs handled by pass 1 are not touched twice)
//! 3. bare `OLD` as a whole word → `NEW` (case-sensitive)
//!
//! Pass 3 is deliberately case-sensitive while passes 1-2 are not; the
//! asymmetry is pinned by a test, since changing it would silently alter
//! which references a run rewrites.
//!
//! The engine is pure: it transforms a string and returns the result. All
//! I/O belongs to the orchestrator.

use crate::error::{Error, Result};

/// Compiled rewrite rules for one old → new domain pair.
#[derive(Debug)]
pub struct DomainRewriter {
    /// Equal domains make the whole engine a no-op, including the
    /// http → https upgrade of pass 1.
    noop: bool,
    scheme: regex::Regex,
    scheme_replacement: String,
    // The lookbehind requires fancy-regex; the `regex` crate has no
    // lookaround support.
    protocol_relative: fancy_regex::Regex,
    protocol_relative_replacement: String,
    bare: regex::Regex,
    bare_replacement: String,
}

impl DomainRewriter {
    pub fn new(old_domain: &str, new_domain: &str) -> Result<Self> {
        let old = regex::escape(old_domain);

        let scheme = regex::Regex::new(&format!(r"(?i)https?://{old}\b"))
            .map_err(|e| Error::Pattern(e.to_string()))?;
        let protocol_relative =
            fancy_regex::Regex::new(&format!(r"(?i)(?<!http:)(?<!https:)//{old}\b"))
                .map_err(|e| Error::Pattern(e.to_string()))?;
        let bare = regex::Regex::new(&format!(r"\b{old}\b"))
            .map_err(|e| Error::Pattern(e.to_string()))?;

        Ok(Self {
            noop: old_domain == new_domain,
            scheme,
            scheme_replacement: format!("https://{new_domain}"),
            protocol_relative,
            protocol_relative_replacement: format!("//{new_domain}"),
            bare,
            bare_replacement: new_domain.to_string(),
        })
    }

    /// Apply the three passes in order and return the rewritten text.
    pub fn rewrite(&self, text: &str) -> String {
        if self.noop {
            return text.to_string();
        }

        let pass1 = self
            .scheme
            .replace_all(text, regex::NoExpand(&self.scheme_replacement));
        let pass2 = self.protocol_relative.replace_all(
            &pass1,
            fancy_regex::NoExpand(&self.protocol_relative_replacement),
        );
        self.bare
            .replace_all(&pass2, regex::NoExpand(&self.bare_replacement))
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> DomainRewriter {
        DomainRewriter::new("old.example", "new.example").unwrap()
    }

    #[test]
    fn text_without_domain_is_unchanged() {
        let text = "nothing to see here, not even example.com";
        assert_eq!(rewriter().rewrite(text), text);
    }

    #[test]
    fn http_upgrades_to_https_on_new_domain() {
        let out = rewriter().rewrite(r#"<a href="http://old.example/x">"#);
        assert!(out.contains("https://new.example/x"));
        assert!(!out.contains("http://old.example"));
    }

    #[test]
    fn https_is_rewritten() {
        let out = rewriter().rewrite("see https://old.example/x for details");
        assert!(out.contains("https://new.example/x"));
    }

    #[test]
    fn scheme_matches_case_insensitively() {
        let out = rewriter().rewrite("HTTP://OLD.EXAMPLE/path");
        assert_eq!(out, "https://new.example/path");
    }

    #[test]
    fn protocol_relative_reference_is_rewritten() {
        let out = rewriter().rewrite(r#"<script src="//old.example/app.js">"#);
        assert!(out.contains("//new.example/app.js"));
    }

    #[test]
    fn full_url_is_not_double_processed_by_pass_two() {
        let out = rewriter().rewrite("https://old.example/a and //old.example/b");
        assert_eq!(out, "https://new.example/a and //new.example/b");
    }

    #[test]
    fn bare_domain_replaced_at_word_boundaries() {
        let out = rewriter().rewrite("mail for old.example, admin@old.example.");
        assert_eq!(out, "mail for new.example, admin@new.example.");
    }

    #[test]
    fn substring_of_larger_token_is_not_replaced() {
        let text = "xold.exampley stays, so does notold.example";
        assert_eq!(rewriter().rewrite(text), text);
    }

    #[test]
    fn bare_domain_match_is_case_sensitive() {
        // Passes 1-2 are case-insensitive; the bare pass is not.
        let text = "Old.Example is mentioned in prose";
        assert_eq!(rewriter().rewrite(text), text);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let r = rewriter();
        let once = r.rewrite("http://old.example/a //old.example/b old.example");
        let twice = r.rewrite(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn identical_domains_are_a_noop() {
        let r = DomainRewriter::new("same.example", "same.example").unwrap();
        // Even the http -> https upgrade is suppressed.
        let text = "http://same.example/x and same.example";
        assert_eq!(r.rewrite(text), text);
    }

    #[test]
    fn dots_in_domains_are_literal() {
        // "oldxexample" must not match "old.example"'s pattern.
        let text = "oldxexample and http://oldxexample/y";
        assert_eq!(rewriter().rewrite(text), text);
    }
}
