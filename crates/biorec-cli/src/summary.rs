use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use biorec_cli::run::RunReport;

pub fn print_summary(report: &RunReport) {
    println!("Source: {}", report.source.display());
    println!("Profile: {}", report.profile_name);
    if let Some(path) = &report.error_file {
        println!("Rejected rows: {}", path.display());
    }
    if let Some(path) = &report.mapping_sidecar {
        println!("Mapping sidecar: {}", path.display());
    }
    if let Some(path) = &report.export_file {
        println!("Entity export: {}", path.display());
    }

    let mut rows = Table::new();
    rows.set_header(vec![
        header_cell("Rows"),
        header_cell("Imported"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut rows);
    align_column(&mut rows, 0, CellAlignment::Right);
    align_column(&mut rows, 1, CellAlignment::Right);
    align_column(&mut rows, 2, CellAlignment::Right);
    rows.add_row(vec![
        Cell::new(report.row_count),
        count_cell(report.successes, Color::Green),
        count_cell(report.errors, Color::Red),
    ]);
    println!("{rows}");

    let entities = &report.entities;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Entity"), header_cell("Created")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, count) in [
        ("Regions", entities.regions),
        ("Sites", entities.sites),
        ("Site visits", entities.site_visits),
        ("Taxa", entities.taxa),
        ("Common names", entities.common_names),
        ("Traits", entities.traits),
        ("Materials", entities.materials),
        ("Material parts", entities.material_parts),
    ] {
        table.add_row(vec![Cell::new(label), zero_dimmed_cell(count)]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn zero_dimmed_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
