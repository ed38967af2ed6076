//! Tunable knobs for a single extraction run.

use std::collections::HashSet;

use regex::Regex;

/// Configuration accepted by [`crate::Readability::new`].
///
/// Every field has a sensible default; most callers only need to override
/// `char_threshold` or `keep_classes`. Construct one with [`ReadabilityOptions::builder`]
/// or simply `ReadabilityOptions::default()`.
#[derive(Debug, Clone)]
pub struct ReadabilityOptions {
    /// Hard cap on the number of elements under `<body>` (0 = unlimited).
    /// Exceeding it fails the parse with `parseFailed` before scoring begins.
    pub max_elems_to_parse: usize,

    /// Capacity of the top-candidate pool used during candidate selection.
    pub nb_top_candidates: usize,

    /// Minimum `textContent` length required to accept an attempt outright.
    pub char_threshold: usize,

    /// When `false` (the default), non-preserved `class` attributes are
    /// stripped from the final output.
    pub keep_classes: bool,

    /// Skip JSON-LD metadata parsing entirely.
    pub disable_json_ld: bool,

    /// Class tokens retained on output even when `keep_classes` is false.
    pub classes_to_preserve: HashSet<String>,

    /// Regex used by conditional cleaning to whitelist embeds/iframes.
    /// `None` means "use the built-in default" (mirrors the source library's
    /// treatment of an empty string).
    pub allowed_video_regex: Option<Regex>,

    /// Additive bias folded into `(1 - linkDensity + modifier)` when scoring.
    pub link_density_modifier: f64,
}

impl Default for ReadabilityOptions {
    fn default() -> Self {
        Self {
            max_elems_to_parse: 0,
            nb_top_candidates: 5,
            char_threshold: 500,
            keep_classes: false,
            disable_json_ld: false,
            classes_to_preserve: HashSet::new(),
            allowed_video_regex: None,
            link_density_modifier: 0.0,
        }
    }
}

impl ReadabilityOptions {
    /// Start building options with library defaults.
    pub fn builder() -> ReadabilityOptionsBuilder {
        ReadabilityOptionsBuilder::default()
    }

    /// The effective video allow-list regex: the caller's override, or the
    /// built-in default covering major video/audio hosts.
    pub fn video_regex(&self) -> &Regex {
        self.allowed_video_regex
            .as_ref()
            .unwrap_or(&crate::constants::REGEXPS.videos)
    }
}

/// Incremental builder for [`ReadabilityOptions`].
#[derive(Debug, Clone, Default)]
pub struct ReadabilityOptionsBuilder {
    opts: OptionOverrides,
}

#[derive(Debug, Clone, Default)]
struct OptionOverrides {
    max_elems_to_parse: Option<usize>,
    nb_top_candidates: Option<usize>,
    char_threshold: Option<usize>,
    keep_classes: Option<bool>,
    disable_json_ld: Option<bool>,
    classes_to_preserve: Option<HashSet<String>>,
    allowed_video_regex: Option<Regex>,
    link_density_modifier: Option<f64>,
}

impl ReadabilityOptionsBuilder {
    pub fn max_elems_to_parse(mut self, value: usize) -> Self {
        self.opts.max_elems_to_parse = Some(value);
        self
    }

    pub fn nb_top_candidates(mut self, value: usize) -> Self {
        self.opts.nb_top_candidates = Some(value.max(1));
        self
    }

    pub fn char_threshold(mut self, value: usize) -> Self {
        self.opts.char_threshold = Some(value);
        self
    }

    pub fn keep_classes(mut self, value: bool) -> Self {
        self.opts.keep_classes = Some(value);
        self
    }

    pub fn disable_json_ld(mut self, value: bool) -> Self {
        self.opts.disable_json_ld = Some(value);
        self
    }

    pub fn classes_to_preserve<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.classes_to_preserve = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    pub fn allowed_video_regex(mut self, regex: Regex) -> Self {
        self.opts.allowed_video_regex = Some(regex);
        self
    }

    pub fn link_density_modifier(mut self, value: f64) -> Self {
        self.opts.link_density_modifier = Some(value);
        self
    }

    pub fn build(self) -> ReadabilityOptions {
        let defaults = ReadabilityOptions::default();
        ReadabilityOptions {
            max_elems_to_parse: self.opts.max_elems_to_parse.unwrap_or(defaults.max_elems_to_parse),
            nb_top_candidates: self.opts.nb_top_candidates.unwrap_or(defaults.nb_top_candidates),
            char_threshold: self.opts.char_threshold.unwrap_or(defaults.char_threshold),
            keep_classes: self.opts.keep_classes.unwrap_or(defaults.keep_classes),
            disable_json_ld: self.opts.disable_json_ld.unwrap_or(defaults.disable_json_ld),
            classes_to_preserve: self
                .opts
                .classes_to_preserve
                .unwrap_or(defaults.classes_to_preserve),
            allowed_video_regex: self.opts.allowed_video_regex,
            link_density_modifier: self
                .opts
                .link_density_modifier
                .unwrap_or(defaults.link_density_modifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let opts = ReadabilityOptions::default();
        assert_eq!(opts.max_elems_to_parse, 0);
        assert_eq!(opts.nb_top_candidates, 5);
        assert_eq!(opts.char_threshold, 500);
        assert!(!opts.keep_classes);
        assert!(!opts.disable_json_ld);
    }

    #[test]
    fn builder_overrides_only_what_is_set() {
        let opts = ReadabilityOptions::builder().char_threshold(100).build();
        assert_eq!(opts.char_threshold, 100);
        assert_eq!(opts.nb_top_candidates, 5);
    }

    #[test]
    fn nb_top_candidates_cannot_go_below_one() {
        let opts = ReadabilityOptions::builder().nb_top_candidates(0).build();
        assert_eq!(opts.nb_top_candidates, 1);
    }
}
