use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{BuildResult, LevelSummary};

pub fn print_summary(result: &BuildResult) {
    println!("Edition: {} ({})", result.edition, result.layout);
    println!("Source: {}", result.source);
    println!("Duplicate policy: {}", result.duplicate_policy);
    match &result.output_dir {
        Some(dir) => println!("Output: {}", dir.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    println!("{}", summary_table(result));
    for path in &result.outputs {
        println!("  {}", path.display());
    }
}

pub fn summary_table(result: &BuildResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Level"),
        header_cell("Table"),
        header_cell("Records"),
        header_cell("Duplicate ids"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_records = 0usize;
    let mut total_duplicates = 0usize;
    for summary in &result.levels {
        total_records += summary.records;
        total_duplicates += summary.duplicate_ids;
        table.add_row(vec![
            level_cell(summary),
            Cell::new(summary.level.table_name()),
            count_cell(summary.records, None),
            count_cell(summary.duplicate_ids, Some(Color::Yellow)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell(format!("{} flat rows", result.rows)),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        count_cell(total_duplicates, Some(Color::Yellow)).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn level_cell(summary: &LevelSummary) -> Cell {
    if summary.records == 0 {
        dim_cell(summary.level)
    } else {
        Cell::new(summary.level)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, highlight: Option<Color>) -> Cell {
    match highlight {
        Some(color) if count > 0 => Cell::new(count).fg(color).add_attribute(Attribute::Bold),
        _ if count == 0 => dim_cell(count),
        _ => Cell::new(count),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use dtb_core::DuplicatePolicy;
    use dtb_model::{ColumnLayout, Level};

    use super::*;

    #[test]
    fn table_lists_levels_and_totals() {
        let result = BuildResult {
            edition: 1940,
            layout: ColumnLayout::TwoLevel,
            source: "DTB_1940.xls".to_string(),
            duplicate_policy: DuplicatePolicy::Structural,
            output_dir: None,
            rows: 3,
            levels: vec![
                LevelSummary {
                    level: Level::State,
                    records: 2,
                    duplicate_ids: 1,
                },
                LevelSummary {
                    level: Level::Municipality,
                    records: 5,
                    duplicate_ids: 0,
                },
            ],
            outputs: Vec::new(),
        };
        let rendered = summary_table(&result).to_string();
        assert!(rendered.contains("municipalities"));
        assert!(rendered.contains("3 flat rows"));
        assert!(rendered.contains("TOTAL"));
    }
}
