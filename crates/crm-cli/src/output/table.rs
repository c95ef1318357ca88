use std::borrow::Cow;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const GAP: &str = "  ";
const MIN_COLUMN: usize = 4;
const PLACEHOLDER: &str = "-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Good,
    Warn,
    Bad,
}

impl Tone {
    const fn ansi(self) -> &'static str {
        match self {
            Self::Good => "32",
            Self::Warn => "33",
            Self::Bad => "31",
        }
    }
}

/// Colour depends on what the field means: `authenticated: true` is good,
/// `expired: true` is bad, and booleans in any other field stay plain.
fn tone(field: &str, value: &str) -> Option<Tone> {
    let name = field.rsplit('.').next().unwrap_or(field);
    match (name, value) {
        ("authenticated" | "is_active", "true") | ("expired", "false") => Some(Tone::Good),
        ("authenticated" | "is_active", "false") | ("expired", "true") => Some(Tone::Bad),
        ("notice", text) if text != PLACEHOLDER => Some(Tone::Warn),
        _ => None,
    }
}

struct Cell {
    text: String,
    tone: Option<Tone>,
}

struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// One line per field of a single entity.
#[must_use]
pub fn key_value(fields: &[(String, String)], options: TableOptions) -> String {
    let rows = fields
        .iter()
        .map(|(key, value)| {
            vec![
                Cell {
                    text: key.clone(),
                    tone: None,
                },
                Cell {
                    text: value.clone(),
                    tone: tone(key, value),
                },
            ]
        })
        .collect();
    Grid {
        headers: vec!["key".into(), "value".into()],
        rows,
    }
    .render(options)
}

/// One line per record, one column per header. Short rows are padded with `-`.
#[must_use]
pub fn records(headers: &[String], rows: &[Vec<String>], options: TableOptions) -> String {
    let rows = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let text = row.get(index).map_or(PLACEHOLDER, String::as_str);
                    Cell {
                        text: text.to_string(),
                        tone: tone(header, text),
                    }
                })
                .collect()
        })
        .collect();
    Grid {
        headers: headers.to_vec(),
        rows,
    }
    .render(options)
}

/// A single `value` column for scalars and lists of non-objects.
#[must_use]
pub fn values(values: &[String], options: TableOptions) -> String {
    let rows = values
        .iter()
        .map(|text| {
            vec![Cell {
                text: text.clone(),
                tone: None,
            }]
        })
        .collect();
    Grid {
        headers: vec!["value".into()],
        rows,
    }
    .render(options)
}

impl Grid {
    fn render(&self, options: TableOptions) -> String {
        let mut widths = self.natural_widths();
        if let Some(limit) = options.max_width {
            self.shrink(&mut widths, limit);
        }
        let numeric = self.numeric_columns();

        let header = self
            .headers
            .iter()
            .enumerate()
            .map(|(index, text)| layout(text, None, widths[index], numeric[index], false))
            .collect::<Vec<_>>()
            .join(GAP);

        let rule = "-".repeat(header.chars().count());
        let mut lines = vec![header, rule];
        for row in &self.rows {
            let line = row
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    layout(
                        &cell.text,
                        cell.tone,
                        widths[index],
                        numeric[index],
                        options.color,
                    )
                })
                .collect::<Vec<_>>()
                .join(GAP);
            lines.push(line);
        }
        lines.join("\n")
    }

    fn natural_widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|index| {
                self.rows
                    .iter()
                    .map(|row| row[index].text.chars().count())
                    .chain(std::iter::once(self.headers[index].chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(MIN_COLUMN)
            })
            .collect()
    }

    /// Narrows whichever column is widest, one character at a time,
    /// stopping at the header width.
    fn shrink(&self, widths: &mut [usize], limit: usize) {
        let floors = self
            .headers
            .iter()
            .map(|header| header.chars().count().max(MIN_COLUMN))
            .collect::<Vec<_>>();
        let total = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
        let mut excess = total.saturating_sub(limit);

        while excess > 0 {
            let Some(widest) = (0..widths.len())
                .filter(|&index| widths[index] > floors[index])
                .max_by_key(|&index| widths[index])
            else {
                break;
            };
            widths[widest] -= 1;
            excess -= 1;
        }
    }

    /// A column is right-aligned when every filled cell in it is a number.
    fn numeric_columns(&self) -> Vec<bool> {
        (0..self.headers.len())
            .map(|index| {
                let mut filled = self
                    .rows
                    .iter()
                    .map(|row| row[index].text.as_str())
                    .filter(|text| *text != PLACEHOLDER)
                    .peekable();
                filled.peek().is_some() && filled.all(is_number)
            })
            .collect()
    }
}

fn is_number(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '.'))
        && text.parse::<f64>().is_ok()
}

fn clip(text: &str, width: usize) -> Cow<'_, str> {
    if text.chars().count() <= width {
        return Cow::Borrowed(text);
    }
    let end = text
        .char_indices()
        .nth(width.saturating_sub(1))
        .map_or(text.len(), |(offset, _)| offset);
    Cow::Owned(format!("{}…", &text[..end]))
}

fn layout(text: &str, tone: Option<Tone>, width: usize, right: bool, color: bool) -> String {
    let text = clip(text, width);
    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
    let text = match tone {
        Some(tone) if color => format!("\u{1b}[{}m{text}\u{1b}[0m", tone.ansi()),
        _ => text.into_owned(),
    };
    if right {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}
