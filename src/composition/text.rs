//! Line breaking for text blocks.
//!
//! Wrapping happens when the composition is built, so both capture strategies receive the same
//! pre-broken lines and agree on block heights. Advances are estimated per face rather than
//! shaped; the rasterizer still places glyphs with real font metrics.

/// Generic font face of a text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FontFace {
    Serif,
    Sans,
    Mono,
    Script,
}

impl FontFace {
    /// CSS `font-family` list handed to the SVG text engine.
    pub fn css_family(self) -> &'static str {
        match self {
            Self::Serif => "Georgia, 'DejaVu Serif', 'Liberation Serif', serif",
            Self::Sans => "'Helvetica Neue', 'DejaVu Sans', 'Liberation Sans', Arial, sans-serif",
            Self::Mono => "'Courier New', 'DejaVu Sans Mono', 'Liberation Mono', monospace",
            Self::Script => "'Snell Roundhand', 'Brush Script MT', cursive",
        }
    }

    /// Average advance of one character as a fraction of the font size.
    pub fn advance_factor(self) -> f64 {
        match self {
            Self::Serif => 0.52,
            Self::Sans => 0.55,
            Self::Mono => 0.60,
            Self::Script => 0.48,
        }
    }
}

/// Estimated rendered width of `text`.
pub fn estimate_width(text: &str, face: FontFace, size: f64) -> f64 {
    text.chars().count() as f64 * face.advance_factor() * size
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Newlines start new paragraphs; words longer than a line are split. Empty input yields no
/// lines.
pub fn wrap_text(text: &str, face: FontFace, size: f64, max_width: f64) -> Vec<String> {
    let per_char = face.advance_factor() * size;
    let max_chars = if per_char > 0.0 && max_width.is_finite() {
        ((max_width / per_char).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let mut lines = Vec::new();
    for paragraph in text.trim_end().split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if line_len == 0 {
                word.len()
            } else {
                line_len + 1 + word.len()
            };
            if needed > max_chars && line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word.iter());
            line_len += word.len();
        }

        if line_len > 0 || !paragraph.trim().is_empty() {
            lines.push(line);
        } else if !lines.is_empty() {
            lines.push(String::new());
        }
    }
    lines
}

/// Keep at most `max_lines`, marking the cut with an ellipsis on the last kept line.
pub fn truncate_lines(mut lines: Vec<String>, max_lines: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let trimmed = last.trim_end().trim_end_matches(['.', ',', ';']).to_string();
        *last = format!("{trimmed}…");
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/composition/text.rs"]
mod tests;
