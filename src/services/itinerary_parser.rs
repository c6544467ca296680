use crate::models::parsed_itinerary::{DaySection, ParsedItinerary};
use crate::services::markdown::plain_lines;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Day,
    Tips,
    TotalCost,
}

pub struct HeadingRule {
    pub kind: SectionKind,
    pub pattern: Regex,
}

/// Section headings recognized in generated text. Every heading ends the
/// section before it, so the order here only matters for readability.
/// Headings never span lines.
pub static HEADING_RULES: LazyLock<Vec<HeadingRule>> = LazyLock::new(|| {
    [
        (SectionKind::Day, r"(?i)\bday[ \t]+\d+[ \t]*:"),
        (SectionKind::Tips, r"(?i)\btips[ \t]*:"),
        (SectionKind::TotalCost, r"(?i)\btotal[ \t]+estimated[ \t]+cost[ \t]*:"),
    ]
    .into_iter()
    .map(|(kind, pattern)| HeadingRule {
        kind,
        pattern: Regex::new(pattern).expect("valid heading regex"),
    })
    .collect()
});

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t#>*_]*(hello\b[^\n!]*!)").expect("valid greeting regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading {
    kind: SectionKind,
    start: usize,
    end: usize,
    label: String,
}

/// Split raw model output into greeting, day sections, tips and total cost.
///
/// Never fails: missing sections come back empty, and text that precedes
/// every heading is kept in `preamble` instead of being dropped.
pub fn parse(text: &str) -> ParsedItinerary {
    let (greeting, body) = extract_greeting(text);
    let headings = locate_headings(&body);

    let first_heading = headings.first().map_or(body.len(), |h| h.start);
    let mut parsed = ParsedItinerary {
        greeting,
        preamble: joined_lines(&body[..first_heading]),
        ..Default::default()
    };

    for (i, heading) in headings.iter().enumerate() {
        let end = headings.get(i + 1).map_or(body.len(), |next| next.start);
        let section = &body[heading.end..end];

        match heading.kind {
            SectionKind::Day => parsed.days.push(DaySection {
                label: heading.label.clone(),
                activity_lines: plain_lines(section),
            }),
            SectionKind::Tips => parsed.tips.extend(plain_lines(section)),
            SectionKind::TotalCost => {
                if let Some(cost) = joined_lines(section) {
                    parsed.total_cost = Some(match parsed.total_cost.take() {
                        Some(previous) => format!("{}\n{}", previous, cost),
                        None => cost,
                    });
                }
            }
        }
    }

    log::debug!(
        "Parsed itinerary: {} day(s), {} tip(s), cost {}",
        parsed.days.len(),
        parsed.tips.len(),
        if parsed.total_cost.is_some() { "present" } else { "absent" }
    );

    parsed
}

/// Pull the first "Hello ...!" line out of the text and return the rest.
fn extract_greeting(text: &str) -> (Option<String>, String) {
    match GREETING.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let greeting = caps.get(1).map(|m| m.as_str().trim().to_string());
            let mut body = String::with_capacity(text.len());
            body.push_str(&text[..whole.start]);
            body.push_str(&text[whole.end..]);
            (greeting, body)
        }
        None => (None, text.to_string()),
    }
}

fn locate_headings(body: &str) -> Vec<Heading> {
    let mut found: Vec<Heading> = HEADING_RULES
        .iter()
        .flat_map(|rule| {
            rule.pattern
                .find_iter(body)
                // `day 9:00` is a time, not a heading
                .filter(move |m| {
                    rule.kind != SectionKind::Day || !followed_by_digit(body, m.end())
                })
                .map(move |m| Heading {
                    kind: rule.kind,
                    start: line_prefix_start(body, m.start(), rule.kind),
                    end: m.end(),
                    label: m.as_str().trim().to_string(),
                })
        })
        .collect();
    found.sort_by_key(|h| h.start);

    let mut headings: Vec<Heading> = Vec::with_capacity(found.len());
    for heading in found {
        if headings.last().map_or(true, |prev| heading.start >= prev.end) {
            headings.push(heading);
        }
    }
    headings
}

fn followed_by_digit(body: &str, end: usize) -> bool {
    body[end..].starts_with(|c: char| c.is_ascii_digit())
}

fn is_decoration(c: char) -> bool {
    c.is_whitespace() || matches!(c, '#' | '*' | '_' | '>' | '-')
}

/// Where a heading really starts. Markdown in front of it on the same line
/// belongs to the heading, and so do plain words in front of `Tips:` or
/// `Total Estimated Cost:` (`## Travel Tips:`). Day headings only take
/// markdown, since words before `day 3:` are usually a sentence.
fn line_prefix_start(body: &str, start: usize, kind: SectionKind) -> usize {
    let line_start = body[..start].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &body[line_start..start];

    let absorbed = match kind {
        SectionKind::Day => prefix.chars().all(is_decoration),
        SectionKind::Tips | SectionKind::TotalCost => prefix
            .chars()
            .all(|c| is_decoration(c) || c.is_alphabetic()),
    };
    if absorbed {
        line_start
    } else {
        start
    }
}

fn joined_lines(block: &str) -> Option<String> {
    let lines = plain_lines(block);
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
