use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use inventory_viewer::inventory::SearchQuery;
use inventory_viewer::model::Category;
use inventory_viewer::{Result, ViewerConfig, render, telemetry, viewer};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    telemetry::init(if cli.verbose { "info" } else { "warn" })?;
    let config = cli.config()?;

    match cli.command {
        Command::Show(args) => {
            let partition = viewer::show(&config)?;
            let category = args.category.map(Category::from);
            let output = match args.format {
                OutputFormat::Text => render::partition_text(&partition, category),
                OutputFormat::Json => match category {
                    Some(category) => render::json(partition.get(category))?,
                    None => render::json(&partition)?,
                },
            };
            print!("{output}");
        }
        Command::Search(args) => {
            let query = SearchQuery {
                item_code: args.item,
                customer: args.customer,
                brand: args.brand,
                remarks: args.remarks,
                text: args.text,
            };
            let outcome =
                viewer::search(&config, &query, args.category.map(Category::from))?;
            let output = match args.format {
                OutputFormat::Text => render::search_text(&outcome),
                OutputFormat::Json => render::json(&outcome)?,
            };
            print!("{output}");
        }
        Command::Columns => {
            let columns = viewer::describe_columns(&config)?;
            print!("{}", render::columns_text(&columns));
        }
        Command::Export(args) => {
            let rows = viewer::export(&config, args.category.into(), &args.output)?;
            println!("wrote {rows} rows to {}", args.output.display());
        }
        Command::Upload(args) => {
            viewer::upload(&config, &args.file, args.password.as_deref())?;
            println!(
                "inventory replaced: {}",
                config.inventory_path.display()
            );
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Browse, search, and replace an Excel inventory workbook."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backing workbook; overrides the configuration file.
    #[arg(long, global = true)]
    inventory: Option<PathBuf>,

    /// Sheet holding the inventory rows; overrides the configuration file.
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Log progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_file(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(path) = &self.inventory {
            config.inventory_path = path.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.sheet = sheet.clone();
        }
        Ok(config.with_env_password())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show the inventory split into Local, Outstation and Other rows.
    Show(ShowArgs),
    /// Filter rows by item code, customer, brand or remarks.
    Search(SearchArgs),
    /// Report which column each logical field resolved to.
    Columns,
    /// Write one category to a new workbook.
    Export(ExportArgs),
    /// Replace the backing workbook.
    Upload(UploadArgs),
}

#[derive(clap::Args)]
struct ShowArgs {
    /// Only show this category.
    #[arg(long, value_enum)]
    category: Option<CategoryArg>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Item code contains.
    #[arg(long)]
    item: Option<String>,

    /// Customer name contains.
    #[arg(long)]
    customer: Option<String>,

    /// Brand contains.
    #[arg(long)]
    brand: Option<String>,

    /// Remarks contain.
    #[arg(long)]
    remarks: Option<String>,

    /// Any searchable field contains.
    #[arg(long)]
    text: Option<String>,

    /// Restrict the search to one category.
    #[arg(long, value_enum)]
    category: Option<CategoryArg>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Category to export.
    #[arg(long, value_enum)]
    category: CategoryArg,

    /// Output workbook path.
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct UploadArgs {
    /// Replacement workbook (.xlsx or .xls).
    #[arg(long)]
    file: PathBuf,

    /// Upload password, when one is configured.
    #[arg(long)]
    password: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CategoryArg {
    Local,
    Outstation,
    Other,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Local => Category::Local,
            CategoryArg::Outstation => Category::Outstation,
            CategoryArg::Other => Category::Other,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}
