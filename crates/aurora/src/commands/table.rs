use aurora_2da::{read::NO_VALUE, TwoDa};
use clap::Args;
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};

#[derive(Args)]
pub struct TableArgs {
    /// An input 2DA file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only print this row
    #[arg(short, long)]
    row: Option<usize>,

    /// Only print these columns
    #[arg(short, long, value_delimiter = ',')]
    column: Vec<String>,
}

impl TableArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let table = TwoDa::read(BufReader::new(f))?;

        let columns = if self.column.is_empty() {
            table.column_names().to_vec()
        } else {
            for column in &self.column {
                table
                    .column_index(column)
                    .ok_or_else(|| miette!("{} has no column '{column}'", self.file.display()))?;
            }
            self.column.clone()
        };

        let rows = match self.row {
            Some(row) if row >= table.row_count() => {
                return Err(miette!("row {row} is out of range, the table has {}", table.row_count()))
            }
            Some(row) => row..row + 1,
            None => 0..table.row_count(),
        };

        println!("\t{}", columns.iter().join("\t"));
        for row in rows {
            let cells = columns
                .iter()
                .map(|column| -> Result<&str> { Ok(table.get(row, column)?.unwrap_or(NO_VALUE)) })
                .collect::<Result<Vec<_>>>()?;
            println!("{row}\t{}", cells.iter().join("\t"));
        }
        Ok(())
    }
}
