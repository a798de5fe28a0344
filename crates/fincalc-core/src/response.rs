//! Turning model output into a `CalculationPlan`.
//!
//! Language models wrap JSON in prose or markdown fences, drop commas between
//! members that sit on separate lines, and leave trailing commas. The repairs
//! here are limited to those cases; anything else is reported as a parse error.

use crate::error::{FincalcError, FincalcResult};
use fincalc_types::CalculationPlan;
use tracing::debug;

/// Parses a plan from raw model output, repairing common JSON slips first.
pub fn parse_plan_response(raw: &str) -> FincalcResult<CalculationPlan> {
    let object = extract_object(raw).ok_or_else(|| FincalcError::PlanParse {
        message: "the response does not contain a JSON object".to_string(),
    })?;

    let repaired = remove_trailing_commas(&insert_missing_commas(object));
    if repaired != object {
        debug!(original_len = object.len(), repaired_len = repaired.len(), "Repaired plan JSON");
    }

    serde_json::from_str(&repaired).map_err(|e| FincalcError::PlanParse { message: e.to_string() })
}

/// Parses strict JSON, with no repairs.
pub fn parse_plan_strict(json: &str) -> FincalcResult<CalculationPlan> {
    CalculationPlan::from_json(json).map_err(|e| FincalcError::PlanParse { message: e.to_string() })
}

/// Text from the first `{` to the last `}`, inclusive.
fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Adds a comma after a line that ends a value when the next line opens a key.
fn insert_missing_commas(json: &str) -> String {
    let lines: Vec<&str> = json.lines().collect();
    let mut output = String::with_capacity(json.len() + 16);

    for (index, line) in lines.iter().enumerate() {
        output.push_str(line);

        let next_opens_key = lines[index + 1..]
            .iter()
            .map(|l| l.trim_start())
            .find(|l| !l.is_empty())
            .is_some_and(|l| l.starts_with('"'));

        if next_opens_key && ends_value(line.trim_end()) {
            output.push(',');
        }
        if index + 1 < lines.len() {
            output.push('\n');
        }
    }

    output
}

/// Last character closes a string, object or array, or ends a number or literal.
fn ends_value(line: &str) -> bool {
    line.chars().last().is_some_and(|c| matches!(c, '"' | '}' | ']') || c.is_ascii_alphanumeric())
}

/// Drops commas that directly precede `}` or `]`, ignoring string contents.
fn remove_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut output = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (index, &ch) in chars.iter().enumerate() {
        if in_string {
            output.push(ch);
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                output.push(ch);
            }
            ',' => {
                let next = chars[index + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    output.push(ch);
                }
            }
            _ => output.push(ch),
        }
    }

    output
}
