use tracing::debug;

use dtb_ingest::SourceRows;
use dtb_model::{ColumnLayout, Dataset};

use crate::error::{CoreError, Result};
use crate::hierarchy::{DuplicatePolicy, HierarchyBuilder};
use crate::normalize::RowNormalizer;
use crate::source::{FixedWidthSource, FixedWidthState, RowSource, is_terminal_row};

/// Options threaded through one dataset build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub duplicate_policy: DuplicatePolicy,
}

/// Build the dataset of one edition from the rows of its source.
///
/// The first `skip_rows` rows are headers. Iteration stops at the first
/// terminal row; everything after it is ignored.
pub fn build_dataset(
    edition: &str,
    layout: ColumnLayout,
    rows: SourceRows,
    skip_rows: usize,
    options: &BuildOptions,
) -> Result<Dataset> {
    let adapter = RowSource::for_layout(layout)?;
    let normalizer = RowNormalizer::new();
    let mut builder = HierarchyBuilder::new(layout, options.duplicate_policy);
    let total = rows.len();

    let consumed = match (adapter, rows) {
        (RowSource::Tabular(source), SourceRows::Cells(rows)) => {
            let mut consumed = 0;
            for (index, cells) in rows.iter().enumerate().skip(skip_rows) {
                if is_terminal_row(cells) {
                    debug!(edition, row = index, "terminal row");
                    break;
                }
                builder.push(&normalizer.normalize(&source.adapt(cells)));
                consumed += 1;
            }
            consumed
        }
        (RowSource::FixedWidth(source), SourceRows::Records(records)) => {
            let mut state = FixedWidthState::new();
            let mut consumed = 0;
            for (index, record) in records.iter().enumerate().skip(skip_rows) {
                if FixedWidthSource::is_terminal_record(record) {
                    debug!(edition, row = index, "terminal record");
                    break;
                }
                consumed += 1;
                if let Some(raw) = source.adapt(record, &mut state) {
                    builder.push(&normalizer.normalize(&raw));
                }
            }
            if let Some(raw) = state.finish() {
                builder.push(&normalizer.normalize(&raw));
            }
            consumed
        }
        (RowSource::Tabular(_), SourceRows::Records(_)) => {
            return Err(CoreError::NoAdapter {
                layout,
                kind: "fixed-width",
            });
        }
        (RowSource::FixedWidth(_), SourceRows::Cells(_)) => {
            return Err(CoreError::NoAdapter {
                layout,
                kind: "tabular",
            });
        }
    };

    debug!(
        edition,
        %layout,
        total_rows = total,
        skipped = skip_rows.min(total),
        consumed,
        normalized = builder.len(),
        "rows normalized"
    );
    Ok(builder.finish(edition))
}

#[cfg(test)]
mod tests {
    use dtb_model::{Cell, Level};

    use super::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|value| Cell::from(*value)).collect()
    }

    #[test]
    fn skips_headers_and_stops_at_terminal_row() {
        let rows = SourceRows::Cells(vec![
            cells(&["UF", "Nome_UF", "", "Município", "Nome_Município"]),
            cells(&["35", "São Paulo", "", "00105", "Adamantina"]),
            cells(&["Fonte: IBGE"]),
            cells(&["33", "Rio de Janeiro", "", "04557", "Rio de Janeiro"]),
        ]);
        let dataset = build_dataset(
            "1940",
            ColumnLayout::TwoLevel,
            rows,
            1,
            &BuildOptions::default(),
        )
        .expect("build");
        assert_eq!(dataset.records(Level::State).len(), 1);
        assert_eq!(dataset.records(Level::Municipality)[0].id, 3500105);
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let error = build_dataset(
            "1991",
            ColumnLayout::FixedWidth,
            SourceRows::Cells(Vec::new()),
            0,
            &BuildOptions::default(),
        )
        .expect_err("cells cannot feed the fixed-width adapter");
        assert_eq!(
            error,
            CoreError::NoAdapter {
                layout: ColumnLayout::FixedWidth,
                kind: "tabular",
            }
        );
    }
}
