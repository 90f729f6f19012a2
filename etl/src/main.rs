//! Salesclean CLI - Clean raw sales spreadsheets into a tidy CSV
//!
//! # Main Commands
//!
//! ```bash
//! salesclean                              # Clean Sales_Dataset_Raw.xlsx
//! salesclean run input.csv -o out.csv     # Clean a specific file
//! salesclean run --config profile.json    # Use custom column names / policy
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! salesclean inspect input.xlsx           # Load only, show detected columns
//! salesclean steps                        # Show the cleaning steps
//! salesclean example-config               # Show the default profile
//! ```

use clap::{Args, Parser, Subcommand};
use salesclean::{
    load_table, run_pipeline, steps_description, CleanOptions, CleaningProfile, DivisionPolicy,
    DEFAULT_INPUT, DEFAULT_OUTPUT,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "salesclean")]
#[command(about = "Clean raw sales data and export it as CSV", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full cleaning pipeline (default)
    Run(RunArgs),

    /// Load a dataset and show what was detected
    Inspect {
        /// Input file (CSV or Excel)
        input: PathBuf,
    },

    /// Show the cleaning steps in execution order
    Steps,

    /// Show the default cleaning profile as JSON
    ExampleConfig,
}

#[derive(Args)]
struct RunArgs {
    /// Input file (CSV or Excel)
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Cleaning profile (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON run report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Fail on rows with Sales = 0 instead of writing inf
    #[arg(long)]
    strict: bool,

    /// Don't print progress
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run(args)) => cmd_run(args),
        Some(Commands::Inspect { input }) => cmd_inspect(&input),
        Some(Commands::Steps) => cmd_steps(),
        Some(Commands::ExampleConfig) => cmd_example_config(),
        None => cmd_run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut profile = match &args.config {
        Some(path) => CleaningProfile::from_file(path)?,
        None => CleaningProfile::default(),
    };
    if args.strict {
        profile.division_policy = DivisionPolicy::Strict;
    }

    let options = CleanOptions {
        input: args.input,
        output: args.output,
        profile,
        report: args.report,
        quiet: args.quiet,
    };

    run_pipeline(&options)?;
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Inspecting: {}", input.display());

    let result = load_table(input)?;
    let info = &result.info;

    eprintln!("   Format: {:?}", info.format);
    if let Some(encoding) = &info.encoding {
        eprintln!("   Encoding: {}", encoding);
    }
    if let Some(delimiter) = info.delimiter {
        eprintln!(
            "   Delimiter: '{}'",
            salesclean::transform::format_delimiter(delimiter)
        );
    }
    eprintln!("   Rows: {}", info.row_count);

    println!("{:<30} {:<8} {}", "Column", "Kind", "Missing");
    for column in result.table.columns() {
        println!(
            "{:<30} {:<8} {}",
            column.name,
            column.kind().to_string(),
            column.missing_count()
        );
    }

    let caps = salesclean::Capabilities::detect(&result.table, &CleaningProfile::default());
    eprintln!("\nWith the default profile:");
    eprintln!("   Date parsing: {}", yes_no(caps.dates));
    eprintln!("   Text columns: {}", caps.text_columns.join(", "));
    eprintln!("   Derived margins: {}", yes_no(caps.margins));
    eprintln!("   Fill columns: {}", caps.fill_columns.join(", "));

    Ok(())
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

fn cmd_steps() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", steps_description());
    Ok(())
}

fn cmd_example_config() -> Result<(), Box<dyn std::error::Error>> {
    let json = CleaningProfile::default().to_json()?;
    println!("{}", json);
    Ok(())
}
