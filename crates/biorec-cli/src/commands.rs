use anyhow::Result;
use comfy_table::Table;

use biorec_cli::progress::BarProgress;
use biorec_cli::run::{self, RunOptions, RunReport};
use biorec_model::RankLadder;

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

pub fn run_import(args: &RunArgs) -> Result<RunReport> {
    let options = RunOptions {
        csv_file: args.csv_file.clone(),
        mapping: args.mapping.clone(),
        errors_out: args.errors_out.clone(),
        ranks: args.ranks.clone(),
        write_error_file: !args.no_error_file,
        export_out: args.export.clone(),
    };
    let mut progress = BarProgress::new(args.no_progress);
    run::run_import(&options, &mut progress)
}

pub fn run_ranks() -> Result<()> {
    let ladder = RankLadder::standard();
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Code"]);
    apply_table_style(&mut table);
    for rank in ladder.iter() {
        table.add_row(vec![rank.long_name.clone(), rank.code.clone()]);
    }
    println!("{table}");
    Ok(())
}
