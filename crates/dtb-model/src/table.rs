#![deny(unsafe_code)]

/// One spreadsheet cell as handed over by a sheet reader.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True for blank cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(value) => value.trim().is_empty(),
            Cell::Number(value) => value.is_nan(),
            Cell::Empty => true,
        }
    }

    /// Render the cell as trimmed text.
    ///
    /// Integral numbers render without a decimal point, so an id stored as
    /// `3550308.0` comes back as `"3550308"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(value) => format_number(*value),
            Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Cell::Empty, Cell::from)
    }
}

fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return Some(format!("{}", value as i64));
    }
    Some(format!("{value}"))
}

/// Count the cells that carry a value.
pub fn filled_cells(cells: &[Cell]) -> usize {
    cells.iter().filter(|cell| !cell.is_blank()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_decimals() {
        assert_eq!(Cell::Number(3550308.0).as_text().as_deref(), Some("3550308"));
        assert_eq!(Cell::Number(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(Cell::Number(f64::NAN).as_text(), None);
    }

    #[test]
    fn numbers_have_no_leading_zeros() {
        assert_eq!(Cell::Number(1.0).as_text().as_deref(), Some("1"));
        assert_eq!(Cell::text("01").as_text().as_deref(), Some("01"));
    }

    #[test]
    fn blank_text_is_empty() {
        assert!(Cell::text("   ").is_blank());
        assert_eq!(Cell::text("  Sé ").as_text().as_deref(), Some("Sé"));
        assert_eq!(Cell::from(""), Cell::Empty);
    }

    #[test]
    fn counts_filled_cells() {
        let cells = vec![Cell::text("35"), Cell::Empty, Cell::text(" ")];
        assert_eq!(filled_cells(&cells), 1);
    }
}
