//! Structural validation of repository URLs.
//!
//! A URL is split into three segments: the protocol `nose`, the `user@host`
//! `core` and the repository path `tail`. Nose and tail are shared by every
//! hosting provider, the core check is supplied by a [`CoreMatcher`].

use regex::Regex;
use tracing::trace;

/// A named regular expression with a single capture group of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSpec {
    name: &'static str,
    pattern: &'static str,
}

impl PatternSpec {
    pub const fn new(name: &'static str, pattern: &'static str) -> Self {
        Self { name, pattern }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }
}

pub const HTTP_NOSE: PatternSpec = PatternSpec::new("nose", r"(?P<nose>^http:)");
pub const HTTPS_NOSE: PatternSpec = PatternSpec::new("nose", r"(?P<nose>^https:)");
pub const BITBUCKET_CORE: PatternSpec =
    PatternSpec::new("core", r"//(?P<core>\w+@\w+\.\w{2,3})");
pub const URL_TAIL: PatternSpec = PatternSpec::new("tail", r"/(?P<tail>[\w/-]+\.git)$");

/// Marker every repository name and URL has to end with.
pub const EXTENSION_MARKER: &str = ".git";

struct CompiledPattern {
    spec: PatternSpec,
    regex: Regex,
}

impl CompiledPattern {
    fn compile(spec: PatternSpec) -> Self {
        Self {
            spec,
            regex: Regex::new(spec.pattern()).unwrap(),
        }
    }

    fn is_match(&self, candidate: &str) -> bool {
        let found = self.regex.is_match(candidate);
        if !found {
            trace!(segment = self.spec.name(), candidate, "segment not found");
        }
        found
    }
}

lazy_static::lazy_static! {
    static ref REGEX_HTTP_NOSE: CompiledPattern = CompiledPattern::compile(HTTP_NOSE);
    static ref REGEX_HTTPS_NOSE: CompiledPattern = CompiledPattern::compile(HTTPS_NOSE);
    static ref REGEX_BITBUCKET_CORE: CompiledPattern = CompiledPattern::compile(BITBUCKET_CORE);
    static ref REGEX_URL_TAIL: CompiledPattern = CompiledPattern::compile(URL_TAIL);
}

/// Decides whether a candidate URL carries the authority segment of one
/// hosting provider.
pub trait CoreMatcher {
    fn matches_core(&self, candidate: &str) -> bool;
}

impl<F> CoreMatcher for F
where
    F: Fn(&str) -> bool,
{
    fn matches_core(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BitbucketCore;

impl CoreMatcher for BitbucketCore {
    fn matches_core(&self, candidate: &str) -> bool {
        REGEX_BITBUCKET_CORE.is_match(candidate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub nose: bool,
    pub core: bool,
    pub tail: bool,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.nose && self.core && self.tail
    }
}

pub fn verify_nose(candidate: &str) -> bool {
    REGEX_HTTP_NOSE.is_match(candidate) || REGEX_HTTPS_NOSE.is_match(candidate)
}

pub fn verify_tail(candidate: &str) -> bool {
    REGEX_URL_TAIL.is_match(candidate)
}

#[derive(Debug, Clone, Default)]
pub struct UrlValidator<C = BitbucketCore> {
    core: C,
}

impl UrlValidator<BitbucketCore> {
    pub fn bitbucket() -> Self {
        Self::new(BitbucketCore)
    }
}

impl<C: CoreMatcher> UrlValidator<C> {
    pub fn new(core: C) -> Self {
        Self { core }
    }

    /// Check every segment of `candidate`, without stopping at the first miss.
    pub fn validate(&self, candidate: &str) -> ValidationResult {
        ValidationResult {
            nose: verify_nose(candidate),
            core: self.core.matches_core(candidate),
            tail: verify_tail(candidate),
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        self.validate(candidate).is_valid()
    }
}
