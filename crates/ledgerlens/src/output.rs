use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use ledgerlens_core::{PipelineSummary, SanitizeReport};

const REPORT_HEADERS: [&str; 10] = [
    "Dataset",
    "Input",
    "Duplicates",
    "Missing keys",
    "Defaults",
    "Prices imputed",
    "Dates imputed",
    "No price",
    "Unrecoverable",
    "Output",
];

pub fn print_summary(summary: &PipelineSummary) {
    println!("Run {} started {}", summary.run_id, summary.started_at);
    println!("{}", cleaning_table(summary));
    println!("{}", segment_table(summary));

    if summary.snapshots.is_empty() {
        println!("No snapshots written");
    } else {
        println!("Snapshots:");
        for path in &summary.snapshots {
            println!("  {}", path.display());
        }
    }
}

fn standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn count(value: usize) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn report_row(dataset: &str, report: &SanitizeReport) -> Vec<Cell> {
    vec![
        Cell::new(dataset),
        count(report.input_rows),
        count(report.duplicates_removed),
        count(report.missing_keys_dropped),
        count(report.defaults_filled),
        count(report.prices_imputed),
        count(report.dates_imputed),
        count(report.missing_price_dropped),
        count(report.unrecoverable_dropped),
        count(report.output_rows),
    ]
}

fn cleaning_table(summary: &PipelineSummary) -> Table {
    let mut table = standard_table();
    table.set_header(REPORT_HEADERS.iter().map(|text| header(text)));
    table.add_row(report_row("transactions", &summary.transactions));
    table.add_row(report_row("profiles", &summary.profiles));
    table
}

fn segment_table(summary: &PipelineSummary) -> Table {
    let mut table = standard_table();
    table.set_header(vec![header("Segment"), header("Customers")]);
    for (segment, customers) in &summary.customers_per_segment {
        table.add_row(vec![Cell::new(segment), count(*customers)]);
    }
    table.add_row(vec![header("Total"), count(summary.customers)]);
    table.add_row(vec![
        Cell::new("Consolidated rows"),
        count(summary.consolidated_rows),
    ]);
    table
}
