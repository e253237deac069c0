//! ASCII-art rendering
//!
//! Diagrams are built from [`Part`]s laid out left to right over a row of
//! text. Every field gets a bracket exactly as wide as the characters it
//! covers in the row:
//!
//! ```text
//!    OUI      NIC
//!  __/\__   __/\__
//! |      | |      |
//! 00:00:5e:00:53:01
//! ```

use crate::Field;

/// Top part of a bracket with width `l`
pub fn bracket_top(l: isize) -> String {
    if l < 0 {
        return String::new();
    }

    match l {
        0 => String::new(),
        1 => "|".to_string(),
        2 => "|\\".to_string(),
        3 => "|\\ ".to_string(),
        4 => " /\\ ".to_string(),
        _ => {
            let left = (l as usize - 4) / 2;
            let right = l as usize - 4 - left;
            format!(" {}/\\{} ", "_".repeat(left), "_".repeat(right))
        }
    }
}

/// Bottom part of a bracket with width `l`
pub fn bracket_bottom(l: isize) -> String {
    if l < 0 {
        return String::new();
    }

    match l {
        0 => String::new(),
        1 => "|".to_string(),
        2 => "||".to_string(),
        _ => format!("|{}|", " ".repeat(l as usize - 2)),
    }
}

/// Character widths of a prefix split over a grouped binary row
///
/// The row renders `total_bits` bits in groups of `group_bits` joined by
/// one separator character. Returns `(prefix, skip, rest)`: the width
/// covered by the first `prefix_len` bits including the separators they
/// cross, a one-character gap when the prefix ends right before a
/// separator, and the width of the remaining bits. The three always add up
/// to the row width.
pub fn split_widths(prefix_len: usize, total_bits: usize, group_bits: usize) -> (usize, usize, usize) {
    let prefix_len = prefix_len.min(total_bits);
    let groups = total_bits / group_bits;
    let width = total_bits + groups - 1;

    let mut separators = (prefix_len / group_bits).min(groups - 1);
    let mut skip = 0;
    if prefix_len > 0 && prefix_len < total_bits && prefix_len % group_bits == 0 {
        // do not draw a bracket edge on top of the separator
        separators -= 1;
        skip = 1;
    }

    let prefix = prefix_len + separators;
    (prefix, skip, width - prefix - skip)
}

/// A horizontal piece of a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Bracketed field with a label centered above it
    Field { width: usize, label: String },
    /// Unbracketed gap, usually a separator character
    Gap(usize),
}

impl Part {
    /// Create a labelled field
    pub fn field(width: usize, label: impl Into<String>) -> Self {
        Part::Field {
            width,
            label: label.into(),
        }
    }

    /// Create a gap
    pub fn gap(width: usize) -> Self {
        Part::Gap(width)
    }

    /// Number of row characters covered
    pub fn width(&self) -> usize {
        match self {
            Part::Field { width, .. } => *width,
            Part::Gap(width) => *width,
        }
    }
}

/// Merge textual segments into parts
///
/// `segments` holds the width and label of each piece of a row whose
/// pieces are joined by one separator character. Neighbours with the same
/// label share one bracket; between different labels the separator becomes
/// a gap.
pub fn group_segments(segments: &[(usize, &str)]) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut current: Option<(usize, &str)> = None;

    for &(width, label) in segments {
        current = match current {
            Some((w, l)) if l == label => Some((w + 1 + width, l)),
            Some((w, l)) => {
                parts.push(Part::field(w, l));
                parts.push(Part::gap(1));
                Some((width, label))
            }
            None => Some((width, label)),
        };
    }

    if let Some((w, l)) = current {
        parts.push(Part::field(w, l));
    }

    parts
}

/// Draw labelled brackets over `row`
///
/// Produces four lines: labels, bracket tops, bracket bottoms and the row.
/// A label that would run into its left neighbour is moved right.
pub fn annotate(parts: &[Part], row: &str) -> String {
    let mut labels = String::new();
    let mut top = String::new();
    let mut bottom = String::new();
    let mut col = 0;

    for part in parts {
        match part {
            Part::Gap(width) => {
                top.push_str(&" ".repeat(*width));
                bottom.push_str(&" ".repeat(*width));
            }
            Part::Field { width, label } => {
                top.push_str(&bracket_top(*width as isize));
                bottom.push_str(&bracket_bottom(*width as isize));

                if *width > 0 && !label.is_empty() {
                    let mut start = (col + width / 2).saturating_sub(label.len() / 2);
                    if !labels.is_empty() {
                        start = start.max(labels.len() + 1);
                    }
                    labels.push_str(&" ".repeat(start - labels.len()));
                    labels.push_str(label);
                }
            }
        }
        col += part.width();
    }

    [labels.as_str(), top.as_str(), bottom.as_str(), row]
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two-column bordered table of fields
pub fn table(fields: &[Field]) -> String {
    let name_width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let value_width = fields.iter().map(|f| f.value.len()).max().unwrap_or(0);
    let border = format!(
        "+{}+{}+",
        "-".repeat(name_width + 2),
        "-".repeat(value_width + 2)
    );

    let mut lines = vec![border.clone()];
    for f in fields {
        lines.push(format!(
            "| {:<nw$} | {:<vw$} |",
            f.name,
            f.value,
            nw = name_width,
            vw = value_width
        ));
    }
    lines.push(border);
    lines.join("\n")
}
