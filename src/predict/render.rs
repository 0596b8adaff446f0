//! Formatting of prediction results for the terminal

use console::{Color, Style};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::predict::describe::Description;
use crate::{Prediction, Tier};

const TEXT_WIDTH: usize = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Terminal style for a description tier
pub fn tier_style(tier: Tier) -> Style {
    let color = match tier {
        Tier::Green => Color::Green,
        Tier::Blue => Color::Blue,
        Tier::Orange => Color::Color256(208),
        Tier::Purple => Color::Magenta,
        Tier::Red => Color::Red,
    };
    Style::new().fg(color).bold()
}

/// Render one prediction and its description
pub fn render(
    prediction: &Prediction,
    description: &Description,
    format: OutputFormat,
    color: bool,
) -> String {
    match format {
        OutputFormat::Table => render_table(prediction, description, color),
        OutputFormat::Json => render_json(prediction, description),
        OutputFormat::Csv => render_csv(prediction, description),
    }
}

fn render_table(prediction: &Prediction, description: &Description, color: bool) -> String {
    let rule = "─".repeat(TEXT_WIDTH + 4);
    let mut out = String::new();

    out.push_str(&format!("┌{}┐\n", rule));
    let heading = format!("The predicted class is: {}", prediction.class_index);
    if color {
        out.push_str(&format!("│  {}\n", Style::new().bold().apply_to(heading)));
    } else {
        out.push_str(&format!("│  {}\n", heading));
    }
    out.push_str(&format!("├{}┤\n", rule));

    if let (Some(title), Some(tier)) = (description.title(), description.tier()) {
        let title = if color {
            tier_style(tier).apply_to(title).to_string()
        } else {
            title.to_string()
        };
        out.push_str(&format!(
            "│  {}  ({:.1}%)\n",
            title,
            prediction.probability * 100.0
        ));
        out.push_str("│\n");
    }
    for line in wrap(description.text(), TEXT_WIDTH) {
        out.push_str(&format!("│  {}\n", line));
    }

    out.push_str(&format!("└{}┘\n", rule));
    out
}

fn render_json(prediction: &Prediction, description: &Description) -> String {
    let value = serde_json::json!({
        "class": prediction.class_index,
        "title": description.title(),
        "description": description.text(),
        "tier": description.tier(),
        "probability": prediction.probability,
        "scores": prediction.scores,
    });
    format!("{:#}", value)
}

fn render_csv(prediction: &Prediction, description: &Description) -> String {
    format!(
        "class,title,tier,probability,description\n{},{},{},{:.4},{}\n",
        prediction.class_index,
        csv_field(description.title().unwrap_or("")),
        description.tier().map(|t| t.to_string()).unwrap_or_default(),
        prediction.probability,
        csv_field(description.text()),
    )
}

fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Greedy word wrap; words longer than `width` get their own line
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
