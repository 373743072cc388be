//! Tooltip rendering: substitutes `@name@` placeholders in a localized template with
//! display-formatted spell variables. Markup tags are already in output form and pass through.

use crate::error::{MergeError, Result};
use crate::spell::SpellVariables;

const DELIMITER: char = '@';

#[derive(Debug, Clone, PartialEq)]
enum Segment<'t> {
    Text(&'t str),
    Placeholder(Placeholder<'t>),
}

/// `@name@` or `@name*factor@`.
#[derive(Debug, Clone, PartialEq)]
struct Placeholder<'t> {
    raw: &'t str,
    name: &'t str,
    scale: Option<f64>,
}

/// Placeholder text plus why it could not be used.
type TokenFault<'t> = (&'t str, String);

fn parse_placeholder(raw: &str) -> std::result::Result<Placeholder<'_>, TokenFault<'_>> {
    let (name, scale) = match raw.split_once('*') {
        Some((name, factor)) => {
            let factor = factor
                .trim()
                .parse::<f64>()
                .map_err(|_| (raw, format!("invalid multiplier '{factor}'")))?;
            (name.trim(), Some(factor))
        }
        None => (raw.trim(), None),
    };
    if name.is_empty() {
        return Err((raw, "empty placeholder".to_string()));
    }
    Ok(Placeholder { raw, name, scale })
}

fn parse_template(template: &str) -> std::result::Result<Vec<Segment<'_>>, TokenFault<'_>> {
    let mut segments = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find(DELIMITER) {
        if open > 0 {
            segments.push(Segment::Text(&rest[..open]));
        }
        let after = &rest[open + DELIMITER.len_utf8()..];
        let close = after
            .find(DELIMITER)
            .ok_or_else(|| (after, "unterminated placeholder".to_string()))?;
        segments.push(Segment::Placeholder(parse_placeholder(&after[..close])?));
        rest = &after[close + DELIMITER.len_utf8()..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    Ok(segments)
}

/// Render `template` for `character_id`. Every placeholder must resolve, or nothing is rendered.
pub fn render_tooltip(
    character_id: &str,
    template: &str,
    variables: &SpellVariables,
) -> Result<String> {
    let fault = |token: &str, reason: String| MergeError::TemplateResolution {
        character_id: character_id.to_string(),
        token: token.to_string(),
        reason,
    };

    let segments = parse_template(template).map_err(|(token, reason)| fault(token, reason))?;
    let mut html = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Text(text) => html.push_str(text),
            Segment::Placeholder(placeholder) => {
                let value = variables.get(placeholder.name).ok_or_else(|| {
                    fault(placeholder.raw, "no such spell variable".to_string())
                })?;
                let shown = match placeholder.scale {
                    Some(factor) => value.scaled(factor).display(),
                    None => value.display(),
                };
                html.push_str(&shown);
            }
        }
    }
    Ok(html)
}
