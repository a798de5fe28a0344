//! Substituted-formula traces.
//!
//! A trace is the symbolic template of a formula with every identifier that
//! names an input replaced by that input's value, followed by ` = <result>`.
//! Traces are for display only and are never parsed back.

use fincalc_types::{PlanInputs, PlanValue, format_number};

/// Replaces whole-identifier occurrences of input names in `template`.
///
/// Identifiers are maximal runs of letters, digits and `_` starting with a letter
/// or `_`, accented letters included, so `i` never matches inside `i_conocida`. Negative numbers are parenthesised to keep `^-n` readable.
pub fn substitute(template: &str, values: &PlanInputs) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut output = String::with_capacity(template.len() + 16);
    let mut position = 0;

    while position < chars.len() {
        let ch = chars[position];
        if ch.is_alphabetic() || ch == '_' {
            let start = position;
            while position < chars.len()
                && (chars[position].is_alphanumeric() || chars[position] == '_')
            {
                position += 1;
            }
            let identifier: String = chars[start..position].iter().collect();
            match values.get(&identifier) {
                Some(value) => output.push_str(&render_value(value)),
                None => output.push_str(&identifier),
            }
        } else if ch.is_ascii_digit() || ch == '.' {
            // numeric literal, including exponent suffixes like 1e-3
            while position < chars.len()
                && (chars[position].is_ascii_alphanumeric() || chars[position] == '.')
            {
                output.push(chars[position]);
                position += 1;
            }
        } else {
            output.push(ch);
            position += 1;
        }
    }

    output
}

/// Full trace line: substituted template, result and optional note.
pub fn render_trace(template: &str, values: &PlanInputs, result: f64, note: Option<&str>) -> String {
    let mut trace = format!("{} = {}", substitute(template, values), format_number(result));
    if let Some(note) = note {
        trace.push_str(&format!(" ({note})"));
    }
    trace
}

fn render_value(value: &PlanValue) -> String {
    match value {
        PlanValue::Number(n) if *n < 0.0 => format!("({})", format_number(*n)),
        other => other.to_string(),
    }
}
