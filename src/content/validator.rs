//! Advisory validation of clip content
//!
//! Runs four independent groups of checks over a clip (security, performance,
//! format and content) and condenses the findings into a 0-100 score. The
//! report is diagnostic only; display and editing never consult it.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::utils::DEFAULT_MAX_LENGTH;
use crate::utils::string_utils::char_len;

use super::sanitizer::allow_list::is_void_element;

/// HTML longer than this is flagged as slow to render
const LARGE_CONTENT_CHARS: usize = 50_000;
/// Deeper element nesting is flagged
const MAX_REASONABLE_DEPTH: usize = 20;
/// More elements than this are flagged
const MAX_REASONABLE_ELEMENTS: usize = 1_000;
/// Plain text shorter than this is flagged
const MIN_TEXT_CHARS: usize = 10;
/// More unmatched tags than this raises the imbalance severity
const IMBALANCE_TOLERANCE: usize = 5;
/// Scores below this fail
const PASS_SCORE: u8 = 60;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script\b").expect("SCRIPT_RE: hardcoded regex is valid"));

/// Script scheme in a URL-bearing attribute; prose mentioning one is not flagged
static SCRIPT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:href|src|action|formaction|cite|data)\s*=\s*["']?\s*(?:javascript|vbscript)\s*:"#,
    )
    .expect("SCRIPT_URL_RE: hardcoded regex is valid")
});

static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:iframe|object|embed)\b").expect("EMBED_RE: hardcoded regex is valid")
});

static EVENT_HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<[^>]*\son[a-z]+\s*=").expect("EVENT_HANDLER_RE: hardcoded regex is valid")
});

static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:href|src)\s*=\s*["']?\s*data:"#)
        .expect("DATA_URL_RE: hardcoded regex is valid")
});

static FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<form\b").expect("FORM_RE: hardcoded regex is valid"));

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<style\b").expect("STYLE_RE: hardcoded regex is valid"));

/// Start or end tag; group 3 ends with `/` for self-closing syntax
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("TAG_RE: hardcoded regex is valid")
});

/// Three or more blank lines in a row
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n(?:[ \t]*\n){3,}").expect("BLANK_LINES_RE: hardcoded regex is valid")
});

/// Which check groups run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    pub check_security: bool,
    pub check_performance: bool,
    pub check_format: bool,
    pub check_content: bool,
    /// Input limit the pipeline enforces; longer HTML is a high-severity issue
    pub max_length: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_security: true,
            check_performance: true,
            check_format: true,
            check_content: true,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Security,
    Performance,
    Format,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Points subtracted from the score
    #[must_use]
    pub fn penalty(self) -> u32 {
        match self {
            Severity::Low => 5,
            Severity::Medium => 10,
            Severity::High => 20,
            Severity::Critical => 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
}

impl ValidationIssue {
    fn new(
        issue_type: IssueType,
        severity: Severity,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub score: u8,
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let penalty: u32 = issues.iter().map(|issue| issue.severity.penalty()).sum();
        let score = u8::try_from(100u32.saturating_sub(penalty)).unwrap_or(0);
        let has_critical = issues
            .iter()
            .any(|issue| issue.severity == Severity::Critical);

        Self {
            score,
            passed: score >= PASS_SCORE && !has_critical,
            issues,
        }
    }

    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Critical)
    }

    pub fn issues_of(&self, issue_type: IssueType) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.issue_type == issue_type)
    }
}

/// Validate a clip's content
#[must_use]
pub fn validate_clip_content(clip: &Clip, options: &ValidationOptions) -> ValidationReport {
    let mut issues = Vec::new();
    let html = clip.usable_html();

    if options.check_security {
        if let Some(html) = html {
            check_security(html, &mut issues);
        }
    }
    if options.check_performance {
        if let Some(html) = html {
            check_performance(html, options.max_length, &mut issues);
        }
    }
    if options.check_format {
        check_format(clip, &mut issues);
    }
    if options.check_content {
        check_content(clip, &mut issues);
    }

    let report = ValidationReport::from_issues(issues);
    debug!(
        "Validated clip {}: score {}, {} issues, passed: {}",
        clip.id,
        report.score,
        report.issues.len(),
        report.passed
    );
    report
}

fn check_security(html: &str, issues: &mut Vec<ValidationIssue>) {
    let checks: [(&Regex, Severity, &str, &str); 7] = [
        (
            &*SCRIPT_RE,
            Severity::Critical,
            "Contains <script> elements",
            "Remove scripts; they are stripped before display anyway",
        ),
        (
            &*SCRIPT_URL_RE,
            Severity::Critical,
            "Contains javascript: or vbscript: URLs",
            "Replace script URLs with ordinary links",
        ),
        (
            &*EMBED_RE,
            Severity::High,
            "Contains embedded frames or objects",
            "Link to embedded content instead of including it",
        ),
        (
            &*EVENT_HANDLER_RE,
            Severity::High,
            "Contains inline event handlers",
            "Remove on* attributes",
        ),
        (
            &*DATA_URL_RE,
            Severity::Medium,
            "Contains data: URLs",
            "Host images and files externally and link to them",
        ),
        (
            &*FORM_RE,
            Severity::Medium,
            "Contains form elements",
            "Forms are not interactive in clips; capture the text instead",
        ),
        (
            &*STYLE_RE,
            Severity::Low,
            "Contains <style> blocks",
            "Rely on the clip theme instead of embedded styles",
        ),
    ];

    for (re, severity, message, suggestion) in checks {
        if re.is_match(html) {
            issues.push(ValidationIssue::new(
                IssueType::Security,
                severity,
                message,
                suggestion,
            ));
        }
    }
}

/// Tag statistics gathered in one scan
#[derive(Debug, Default, PartialEq, Eq)]
struct TagScan {
    elements: usize,
    max_depth: usize,
    unmatched: usize,
}

fn scan_tags(html: &str) -> TagScan {
    let mut scan = TagScan::default();
    let mut depth = 0usize;
    let mut balance: HashMap<String, i64> = HashMap::new();

    for caps in TAG_RE.captures_iter(html) {
        let closing = &caps[1] == "/";
        let tag = caps[2].to_ascii_lowercase();
        let self_closing = caps[3].trim_end().ends_with('/');

        if is_void_element(&tag) {
            if !closing {
                scan.elements += 1;
            }
            continue;
        }

        if closing {
            depth = depth.saturating_sub(1);
            *balance.entry(tag).or_default() -= 1;
        } else {
            scan.elements += 1;
            if self_closing {
                continue;
            }
            depth += 1;
            scan.max_depth = scan.max_depth.max(depth);
            *balance.entry(tag).or_default() += 1;
        }
    }

    scan.unmatched = balance
        .values()
        .map(|count| usize::try_from(count.unsigned_abs()).unwrap_or(usize::MAX))
        .sum();
    scan
}

fn check_performance(html: &str, max_length: usize, issues: &mut Vec<ValidationIssue>) {
    let length = char_len(html);
    if length > max_length {
        issues.push(ValidationIssue::new(
            IssueType::Performance,
            Severity::High,
            format!("Content is {length} characters, over the {max_length} limit"),
            "Split the clip; oversized content falls back to a truncated rendering",
        ));
    } else if length > LARGE_CONTENT_CHARS {
        issues.push(ValidationIssue::new(
            IssueType::Performance,
            Severity::Medium,
            format!("Content is large ({length} characters)"),
            "Consider clipping a smaller selection",
        ));
    }

    let scan = scan_tags(html);
    if scan.max_depth > MAX_REASONABLE_DEPTH {
        issues.push(ValidationIssue::new(
            IssueType::Performance,
            Severity::Medium,
            format!("Elements are nested {} levels deep", scan.max_depth),
            "Simplify the markup structure",
        ));
    }
    if scan.elements > MAX_REASONABLE_ELEMENTS {
        issues.push(ValidationIssue::new(
            IssueType::Performance,
            Severity::Medium,
            format!("Content has {} elements", scan.elements),
            "Clip a smaller selection",
        ));
    }
}

fn check_format(clip: &Clip, issues: &mut Vec<ValidationIssue>) {
    if let Some(html) = clip.usable_html() {
        let unmatched = scan_tags(html).unmatched;
        if unmatched > 0 {
            let severity = if unmatched > IMBALANCE_TOLERANCE {
                Severity::Medium
            } else {
                Severity::Low
            };
            issues.push(ValidationIssue::new(
                IssueType::Format,
                severity,
                format!("{unmatched} unmatched opening or closing tags"),
                "Re-capture the clip; unbalanced markup is repaired on display",
            ));
        }
    }

    let fields = [
        ("HTML", clip.usable_html()),
        ("Plain text", clip.usable_text()),
    ];
    for (label, value) in fields {
        let Some(value) = value else { continue };
        if value.trim() != value {
            issues.push(ValidationIssue::new(
                IssueType::Format,
                Severity::Low,
                format!("{label} has leading or trailing whitespace"),
                "Trim the content",
            ));
        }
        if BLANK_LINES_RE.is_match(value) {
            issues.push(ValidationIssue::new(
                IssueType::Format,
                Severity::Low,
                format!("{label} has runs of blank lines"),
                "Collapse consecutive blank lines",
            ));
        }
    }
}

fn check_content(clip: &Clip, issues: &mut Vec<ValidationIssue>) {
    if clip.usable_title().is_none() {
        issues.push(ValidationIssue::new(
            IssueType::Content,
            Severity::Low,
            "Clip has no title",
            "Add a title so the clip is easy to find",
        ));
    }

    match (clip.usable_html(), clip.usable_text()) {
        (None, None) => issues.push(ValidationIssue::new(
            IssueType::Content,
            Severity::High,
            "Clip has neither HTML nor text content",
            "Re-capture the clip",
        )),
        (Some(_), None) => issues.push(ValidationIssue::new(
            IssueType::Content,
            Severity::Low,
            "HTML has no plain-text companion",
            "Store a plain-text copy for search",
        )),
        (_, Some(text)) => {
            if char_len(text.trim()) < MIN_TEXT_CHARS {
                issues.push(ValidationIssue::new(
                    IssueType::Content,
                    Severity::Low,
                    "Text content is very short",
                    "Check that the capture selected the intended content",
                ));
            }
        }
    }
}
