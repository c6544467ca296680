use crate::models::parsed_itinerary::ParsedItinerary;
use crate::models::render_tree::{ActivityNode, IconCategory, RenderNode, RenderTree};
use crate::services::itinerary_parser::parse;
use regex::Regex;
use std::sync::LazyLock;

const TOTAL_COST_LABEL: &str = "Total Estimated Cost";

/// Keyword rules checked top to bottom; the first category with a matching word wins.
const ICON_KEYWORDS: &[(IconCategory, &[&str])] = &[
    (IconCategory::Morning, &["morning", "breakfast", "sunrise"]),
    (IconCategory::Afternoon, &["afternoon", "lunch"]),
    (IconCategory::Evening, &["evening", "dinner", "night"]),
    (IconCategory::Dining, &["restaurant", "cuisine", "food", "dining"]),
    (IconCategory::Lodging, &["hotel", "accommodation", "stay"]),
    (IconCategory::Transport, &["train", "bus", "taxi", "transport"]),
    (IconCategory::Flight, &["flight", "airport", "airline"]),
    (IconCategory::Culture, &["museum", "gallery", "galleries"]),
    (IconCategory::Shopping, &["shopping", "market", "bazaar"]),
];

static ICON_RULES: LazyLock<Vec<(IconCategory, Regex)>> = LazyLock::new(|| {
    ICON_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let pattern = format!(r"(?i)\b(?:{})(?:s|es)?\b", keywords.join("|"));
            (*category, Regex::new(&pattern).expect("valid icon keyword regex"))
        })
        .collect()
});

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    let amount = r"\d(?:[\d,]*\d)?(?:\.\d+)?";
    // A trailing `/person` or `/night` stays with the price.
    let per_unit = r"(?:[ \t]?/[ \t]?[a-z]+\b)?";
    Regex::new(&format!(
        r"(?i)(?:[₹$€£¥]\s?{amount}|\b(?:INR|Rs\.?)\s?{amount}|{amount}\s?(?:rupees\b|Rs\b\.?)){per_unit}"
    ))
    .expect("valid price regex")
});

pub fn classify(line: &str) -> IconCategory {
    ICON_RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(line))
        .map_or(IconCategory::Default, |(category, _)| *category)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '|' | ',' | '(' | ')')
}

/// Find the first price in a line. Returns the display text with the price
/// (and any separators left dangling around it) removed, plus the price itself.
pub fn extract_price(line: &str) -> (String, Option<String>) {
    let Some(found) = PRICE.find(line) else {
        return (line.trim().to_string(), None);
    };

    let head = line[..found.start()].trim_end_matches(is_separator);
    let tail = line[found.end()..].trim_start_matches(is_separator);
    let text = match (head.is_empty(), tail.is_empty()) {
        (false, false) => format!("{} {}", head.trim_start(), tail.trim_end()),
        (false, true) => head.trim_start().to_string(),
        (true, false) => tail.trim_end().to_string(),
        (true, true) => String::new(),
    };

    (text, Some(found.as_str().trim().to_string()))
}

pub fn render_activity(line: &str) -> ActivityNode {
    let category = classify(line);
    let (text, price) = extract_price(line);
    ActivityNode {
        category,
        icon: category.icon().to_string(),
        text,
        price,
    }
}

/// Build the card layout for a parsed itinerary. Pure: the same input
/// always produces the same tree.
pub fn render(parsed: &ParsedItinerary) -> RenderTree {
    let mut nodes = Vec::new();

    if let Some(greeting) = &parsed.greeting {
        nodes.push(RenderNode::Greeting {
            text: greeting.clone(),
        });
    }
    if let Some(preamble) = &parsed.preamble {
        nodes.push(RenderNode::RawText {
            text: preamble.clone(),
        });
    }
    for day in &parsed.days {
        nodes.push(RenderNode::Day {
            label: day.label.clone(),
            activities: day.activity_lines.iter().map(|l| render_activity(l)).collect(),
        });
    }
    if !parsed.tips.is_empty() {
        nodes.push(RenderNode::Tips {
            items: parsed.tips.clone(),
        });
    }
    if let Some(amount) = &parsed.total_cost {
        nodes.push(RenderNode::TotalCost {
            label: TOTAL_COST_LABEL.to_string(),
            amount: amount.clone(),
        });
    }

    RenderTree { nodes }
}

/// Parse and render in one step.
pub fn render_text(text: &str) -> RenderTree {
    render(&parse(text))
}
