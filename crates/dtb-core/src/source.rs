//! Per-edition row adapters.
//!
//! An adapter turns one raw source row into a [`RawRow`]: exactly one
//! (id, name) pair per level, with levels outside the edition's layout left
//! absent. Tabular editions map fixed column indices; the legacy flat file is
//! decoded from fixed-width byte records with an explicit [`FixedWidthState`]
//! carried between records.

use dtb_ingest::decode_text;
use dtb_model::{Cell, ColumnLayout, Level, RawPair, RawRow, filled_cells};

use crate::error::{CoreError, Result};

/// Column indices of the (id, name) pair of each level, or `None` when the
/// layout does not carry the level.
type ColumnMap = [Option<(usize, usize)>; 6];

const TWO_LEVEL_COLUMNS: ColumnMap = [Some((0, 1)), None, None, Some((3, 4)), None, None];

const FOUR_LEVEL_COLUMNS: ColumnMap = [
    Some((0, 1)),
    Some((2, 3)),
    Some((4, 5)),
    Some((6, 7)),
    None,
    None,
];

const SIX_LEVEL_COLUMNS: ColumnMap = [
    Some((0, 1)),
    Some((2, 3)),
    Some((4, 5)),
    Some((6, 7)),
    Some((8, 9)),
    Some((10, 11)),
];

// Columns 6, 9 and 12 hold values the hierarchy does not use.
const SIX_LEVEL_GAPPED_COLUMNS: ColumnMap = [
    Some((0, 1)),
    Some((2, 3)),
    Some((4, 5)),
    Some((7, 8)),
    Some((10, 11)),
    Some((13, 14)),
];

/// A row with fewer than two filled cells ends the sheet's data.
pub fn is_terminal_row(cells: &[Cell]) -> bool {
    filled_cells(cells) < 2
}

/// Adapter for spreadsheet editions.
#[derive(Debug, Clone, Copy)]
pub struct TabularSource {
    layout: ColumnLayout,
    columns: &'static ColumnMap,
}

impl TabularSource {
    pub fn for_layout(layout: ColumnLayout) -> Result<Self> {
        let columns = match layout {
            ColumnLayout::TwoLevel => &TWO_LEVEL_COLUMNS,
            ColumnLayout::FourLevel => &FOUR_LEVEL_COLUMNS,
            ColumnLayout::SixLevel => &SIX_LEVEL_COLUMNS,
            ColumnLayout::SixLevelGapped => &SIX_LEVEL_GAPPED_COLUMNS,
            ColumnLayout::FixedWidth => {
                return Err(CoreError::NoAdapter {
                    layout,
                    kind: "tabular",
                });
            }
        };
        Ok(Self { layout, columns })
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    /// Map one row of cells onto the six level pairs.
    ///
    /// Cells past the end of the row read as blank.
    pub fn adapt(&self, cells: &[Cell]) -> RawRow {
        let mut row = RawRow::empty(self.layout);
        for level in Level::ALL {
            let Some((id_col, name_col)) = self.columns[level.index()] else {
                continue;
            };
            let pair = RawPair {
                id: cells.get(id_col).and_then(Cell::as_text),
                name: cells.get(name_col).and_then(Cell::as_text),
            };
            row.set(level, pair);
        }
        row
    }
}

/// Widths of the id fields at the start of a fixed-width record.
const FIELD_WIDTHS: [usize; 6] = [2, 2, 3, 5, 2, 2];
const ID_AREA_WIDTH: usize = 16;

/// Accumulator carried between fixed-width records.
///
/// Records only spell out the ids they change, a blank name keeps the name
/// of the previous record at the same position, and a record with no ids
/// continues the name of the record before it. The last decoded row is held
/// back until the next record shows it is complete.
#[derive(Debug, Clone, Default)]
pub struct FixedWidthState {
    target: Option<Level>,
    ids: [Option<String>; 6],
    names: [Option<String>; 6],
    pending: Option<RawRow>,
}

impl FixedWidthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the row still held back.
    pub fn finish(&mut self) -> Option<RawRow> {
        self.pending.take()
    }

    fn build_row(&self, target: Level) -> RawRow {
        let mut row = RawRow::empty(ColumnLayout::FixedWidth);
        for level in Level::ALL.into_iter().take(target.index() + 1) {
            row.set(
                level,
                RawPair {
                    id: self.ids[level.index()].clone(),
                    name: self.names[level.index()].clone(),
                },
            );
        }
        row
    }
}

/// Adapter for the legacy fixed-width flat file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthSource;

impl FixedWidthSource {
    /// A record too short to hold the id fields, or with a blank id area,
    /// ends the data.
    pub fn is_terminal_record(record: &[u8]) -> bool {
        record.len() < ID_AREA_WIDTH
            || record[..ID_AREA_WIDTH]
                .iter()
                .all(|byte| byte.is_ascii_whitespace())
    }

    /// Feed one record, returning the previous row once it is complete.
    pub fn adapt(&self, record: &[u8], state: &mut FixedWidthState) -> Option<RawRow> {
        if Self::is_terminal_record(record) {
            return None;
        }
        let ids = parse_id_fields(&record[..ID_AREA_WIDTH]);
        let name = decode_text(&record[ID_AREA_WIDTH..]).trim().to_string();

        let Some(target) = Level::ALL
            .into_iter()
            .rev()
            .find(|level| ids[level.index()].is_some())
        else {
            continue_name(state, &name);
            return None;
        };

        // Once an id changes, nothing remembered below it still applies.
        let mut changed = false;
        for level in Level::ALL {
            let index = level.index();
            if level > target {
                state.ids[index] = None;
                state.names[index] = None;
                continue;
            }
            match &ids[index] {
                Some(id) if state.ids[index].as_ref() != Some(id) => {
                    state.ids[index] = Some(id.clone());
                    state.names[index] = None;
                    changed = true;
                }
                Some(_) => {}
                // Ancestors the record leaves zeroed keep the remembered id.
                None if changed => {
                    state.ids[index] = None;
                    state.names[index] = None;
                }
                None => {}
            }
        }
        if !name.is_empty() {
            state.names[target.index()] = Some(name);
        }
        state.target = Some(target);

        let row = state.build_row(target);
        state.pending.replace(row)
    }
}

/// Append a continuation record's text to the name of the previous record.
fn continue_name(state: &mut FixedWidthState, text: &str) {
    let Some(target) = state.target else {
        return;
    };
    if text.is_empty() {
        return;
    }
    let slot = &mut state.names[target.index()];
    let joined = match slot.take() {
        Some(existing) => format!("{existing} {text}"),
        None => text.to_string(),
    };
    *slot = Some(joined.clone());
    if let Some(pending) = state.pending.as_mut() {
        let id = pending.pair(target).id.clone();
        pending.set(
            target,
            RawPair {
                id,
                name: Some(joined),
            },
        );
    }
}

/// Split the id area into per-level digit strings; zero, blank or
/// non-numeric fields read as absent.
fn parse_id_fields(area: &[u8]) -> [Option<String>; 6] {
    let mut ids: [Option<String>; 6] = Default::default();
    let mut offset = 0;
    for (index, width) in FIELD_WIDTHS.into_iter().enumerate() {
        let field = &area[offset..offset + width];
        offset += width;
        let digits = field.iter().all(u8::is_ascii_digit);
        let zero = field.iter().all(|byte| *byte == b'0');
        if digits && !zero {
            ids[index] = Some(String::from_utf8_lossy(field).into_owned());
        }
    }
    ids
}

/// Adapter selected from an edition's layout.
#[derive(Debug, Clone, Copy)]
pub enum RowSource {
    Tabular(TabularSource),
    FixedWidth(FixedWidthSource),
}

impl RowSource {
    pub fn for_layout(layout: ColumnLayout) -> Result<Self> {
        match layout {
            ColumnLayout::FixedWidth => Ok(Self::FixedWidth(FixedWidthSource)),
            other => TabularSource::for_layout(other).map(Self::Tabular),
        }
    }

    pub fn layout(&self) -> ColumnLayout {
        match self {
            RowSource::Tabular(source) => source.layout(),
            RowSource::FixedWidth(_) => ColumnLayout::FixedWidth,
        }
    }
}
