use serde::{Deserialize, Serialize};

/// One `Day N:` block of a generated itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySection {
    /// Heading text exactly as it appeared, e.g. `Day 1:`
    pub label: String,
    pub activity_lines: Vec<String>,
}

/// Structured view of free-form itinerary text. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItinerary {
    pub greeting: Option<String>,
    /// Text before the first recognized heading. Holds the whole body when
    /// the input has no headings at all.
    pub preamble: Option<String>,
    pub days: Vec<DaySection>,
    pub tips: Vec<String>,
    pub total_cost: Option<String>,
}

impl ParsedItinerary {
    pub fn is_empty(&self) -> bool {
        self.greeting.is_none()
            && self.preamble.is_none()
            && self.days.is_empty()
            && self.tips.is_empty()
            && self.total_cost.is_none()
    }

    /// Re-join every recognized section back into plain text.
    pub fn to_text(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();

        if let Some(greeting) = &self.greeting {
            blocks.push(greeting.clone());
        }
        if let Some(preamble) = &self.preamble {
            blocks.push(preamble.clone());
        }
        for day in &self.days {
            let mut block = day.label.clone();
            for line in &day.activity_lines {
                block.push('\n');
                block.push_str(line);
            }
            blocks.push(block);
        }
        if !self.tips.is_empty() {
            blocks.push(format!("Tips:\n{}", self.tips.join("\n")));
        }
        if let Some(cost) = &self.total_cost {
            blocks.push(format!("Total Estimated Cost: {}", cost));
        }

        blocks.join("\n")
    }
}
