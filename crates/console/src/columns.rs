//! Side-by-side sample columns with change highlighting.
//!
//! The newest sample is the leftmost column. A cell is drawn in red when it
//! differs from the cell to its right (the next older sample), so each pair
//! of neighbours is compared on its own.

use std::collections::{BTreeSet, VecDeque};
use std::io::{self, Write};

use crossterm::cursor::MoveToPreviousLine;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use routerwatch_core::RouterWatchError;

/// Extra spaces added to computed title and value widths.
pub const PAD_SIZE: usize = 5;

/// One point-in-time snapshot: ordered label/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySample {
    fields: Vec<(String, String)>,
}

impl DisplaySample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: &str, value: impl ToString) -> Self {
        self.push(label, value);
        self
    }

    /// Adds a field, replacing the value if the label already exists.
    pub fn push(&mut self, label: &str, value: impl ToString) {
        let value = value.to_string();
        match self.fields.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((label.to_string(), value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(label, _)| label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn label_set(&self) -> BTreeSet<&str> {
        self.labels().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug)]
pub struct ColumnDisplay {
    section_title: String,
    capacity: usize,
    title_width: usize,
    value_width: usize,
    columns: VecDeque<DisplaySample>,
    printed_lines: usize,
}

impl ColumnDisplay {
    /// Widths left at zero are computed from the first sample added.
    pub fn new(section_title: &str, capacity: usize) -> Self {
        Self {
            section_title: section_title.to_string(),
            capacity: capacity.max(1),
            title_width: 0,
            value_width: 0,
            columns: VecDeque::new(),
            printed_lines: 0,
        }
    }

    pub fn with_title_width(mut self, width: usize) -> Self {
        self.title_width = width;
        self
    }

    pub fn with_value_width(mut self, width: usize) -> Self {
        self.value_width = width;
        self
    }

    pub fn title_width(&self) -> usize {
        self.title_width
    }

    pub fn value_width(&self) -> usize {
        self.value_width
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Retained samples, newest first.
    pub fn columns(&self) -> impl Iterator<Item = &DisplaySample> {
        self.columns.iter()
    }

    /// Lines written by the last `render`.
    pub fn printed_lines(&self) -> usize {
        self.printed_lines
    }

    /// Adds `sample` as the newest column, evicting the oldest past capacity.
    ///
    /// Every column must carry the same labels as the current newest one.
    pub fn add_column(&mut self, sample: DisplaySample) -> Result<(), RouterWatchError> {
        if let Some(newest) = self.columns.front() {
            let expected = newest.label_set();
            let actual = sample.label_set();
            if expected != actual {
                let diff: Vec<&str> = expected.symmetric_difference(&actual).copied().collect();
                return Err(RouterWatchError::SampleKeys(diff.join(", ")));
            }
        }

        if self.value_width == 0 {
            let longest = sample.values().map(|value| value.chars().count()).max().unwrap_or(0);
            self.value_width = longest + PAD_SIZE;
        }
        if self.title_width == 0 {
            let longest = sample.labels().map(|label| label.chars().count()).max().unwrap_or(0);
            self.title_width = longest + PAD_SIZE;
        }

        self.columns.push_front(sample);
        self.columns.truncate(self.capacity);
        Ok(())
    }

    /// Rows in the newest sample's label order, cells newest to oldest.
    pub fn layout(&self) -> Vec<Row> {
        let Some(newest) = self.columns.front() else {
            return Vec::new();
        };

        newest
            .labels()
            .map(|label| {
                let cells = self
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(index, column)| {
                        let text = column.get(label).unwrap_or_default();
                        let changed = self
                            .columns
                            .get(index + 1)
                            .is_some_and(|older| older.get(label).unwrap_or_default() != text);
                        Cell {
                            text: text.to_string(),
                            changed,
                        }
                    })
                    .collect();
                Row {
                    label: label.to_string(),
                    cells,
                }
            })
            .collect()
    }

    /// Writes the section. Returns `false` when there is nothing to show.
    ///
    /// With `reset_cursor` the cursor is moved back to the title line so the
    /// next render draws over this one.
    pub fn render<W: Write>(&mut self, out: &mut W, reset_cursor: bool) -> io::Result<bool> {
        if self.columns.is_empty() {
            return Ok(false);
        }

        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(&self.section_title),
            SetAttribute(Attribute::Reset),
            Print("\n")
        )?;
        let mut lines = 1;

        for row in self.layout() {
            let title = format!("{}:", row.label);
            queue!(out, Print(format!("  {title:<width$}", width = self.title_width)))?;
            for cell in &row.cells {
                let text = format!("{:<width$}", cell.text, width = self.value_width);
                if cell.changed {
                    queue!(out, SetForegroundColor(Color::Red), Print(text), ResetColor)?;
                } else {
                    queue!(out, Print(text))?;
                }
            }
            queue!(out, Print("\n"))?;
            lines += 1;
        }

        self.printed_lines = lines;
        if reset_cursor {
            let up = u16::try_from(lines).unwrap_or(u16::MAX);
            queue!(out, MoveToPreviousLine(up))?;
        }
        out.flush()?;
        Ok(true)
    }
}
