use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Morning,
    Afternoon,
    Evening,
    Dining,
    Lodging,
    Transport,
    Flight,
    Culture,
    Shopping,
    Default,
}

impl IconCategory {
    pub fn icon(&self) -> &'static str {
        match self {
            IconCategory::Morning => "🌅",
            IconCategory::Afternoon => "☀️",
            IconCategory::Evening => "🌙",
            IconCategory::Dining => "🍽️",
            IconCategory::Lodging => "🏨",
            IconCategory::Transport => "🚆",
            IconCategory::Flight => "✈️",
            IconCategory::Culture => "🏛️",
            IconCategory::Shopping => "🛍️",
            IconCategory::Default => "📍",
        }
    }
}

/// A single activity line ready for display: icon, text and an optional price badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityNode {
    pub category: IconCategory,
    pub icon: String,
    pub text: String,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    Greeting { text: String },
    RawText { text: String },
    Day {
        label: String,
        activities: Vec<ActivityNode>,
    },
    Tips { items: Vec<String> },
    TotalCost { label: String, amount: String },
}

/// Display-independent card layout of an itinerary, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTree {
    pub nodes: Vec<RenderNode>,
}

impl RenderTree {
    pub fn days(&self) -> impl Iterator<Item = (&str, &[ActivityNode])> {
        self.nodes.iter().filter_map(|node| match node {
            RenderNode::Day { label, activities } => Some((label.as_str(), activities.as_slice())),
            _ => None,
        })
    }
}
