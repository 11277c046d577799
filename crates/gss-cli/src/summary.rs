use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use gss_model::ColumnLayout;
use gss_transform::ValueCount;

use crate::cli::LayoutFormatArg;
use crate::types::DatasetSummary;

pub fn render_layout(layout: &ColumnLayout, format: LayoutFormatArg) -> Result<String> {
    match format {
        LayoutFormatArg::Table => Ok(layout_table(layout).to_string()),
        LayoutFormatArg::Json => {
            serde_json::to_string_pretty(layout).context("serialize layout")
        }
    }
}

pub fn layout_table(layout: &ColumnLayout) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("Width"),
        header_cell("Format"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for field in layout {
        table.add_row(vec![
            Cell::new(&field.name).add_attribute(Attribute::Bold),
            Cell::new(field.field_type),
            Cell::new(field.start),
            field.end.map_or_else(|| dim_cell("EOL"), Cell::new),
            field.width().map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&field.format),
            Cell::new(&field.description),
        ]);
    }
    table
}

pub fn value_counts_table(field: &str, counts: &[ValueCount]) -> Table {
    let total: usize = counts.iter().map(|c| c.count).sum();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(field),
        header_cell("Count"),
        header_cell("Percent"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in counts {
        table.add_row(vec![
            Cell::new(&entry.value),
            Cell::new(entry.count),
            Cell::new(percent(entry.count, total)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
        dim_cell("100.0%"),
    ]);
    table
}

pub fn print_dataset_summary(summary: &DatasetSummary) {
    println!("Source: {}", summary.source.display());
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("Rows"), Cell::new(summary.rows)]);
    table.add_row(vec![header_cell("Columns"), Cell::new(summary.columns)]);
    if let Some(recode) = &summary.recode {
        table.add_row(vec![
            header_cell("Recoded values"),
            Cell::new(recode.total_replaced()),
        ]);
        table.add_row(vec![
            header_cell("Recoded fields"),
            Cell::new(recode.replaced.len()),
        ]);
        table.add_row(vec![
            header_cell("Absent table fields"),
            dim_cell(recode.skipped.len()),
        ]);
    }
    if let Some(info) = &summary.resample {
        table.add_row(vec![header_cell("Weight"), Cell::new(&info.weight)]);
        table.add_row(vec![
            header_cell("Grouped by"),
            info.group_by
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
        table.add_row(vec![
            header_cell("Seed"),
            info.seed.map_or_else(|| dim_cell("random"), Cell::new),
        ]);
    }
    if let Some(path) = &summary.output {
        table.add_row(vec![
            header_cell("Output"),
            Cell::new(path.display()).fg(Color::Green),
        ]);
    }
    println!("{table}");
}

fn percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
