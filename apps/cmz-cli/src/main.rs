use clap::{Parser, Subcommand};
use cmz_app::{
    AppError, AppResult, RecordFilter, extract_service, load_config, parse_filter, parse_ratio,
    project_csv, ratio_csv, resolve_columns, segment, species_ratio, table_summary,
};
use cmz_core::{ModelFamily, Phase, Stage, species};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cmz-cli")]
#[command(about = "CMZ explorer - stage-labelled tables from astrochemical model grids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the grid catalog and report run availability
    Validate {
        /// Path to the explorer YAML config
        config_path: PathBuf,
    },
    /// Regenerate both extracted tables
    Extract {
        /// Path to the explorer YAML config
        config_path: PathBuf,
        /// Extract runs on a worker pool
        #[arg(long)]
        parallel: bool,
    },
    /// Summarize persisted tables
    Summary {
        /// Path to the explorer YAML config
        config_path: PathBuf,
        /// Model family (hotcore or cshock); both when omitted
        family: Option<String>,
    },
    /// Export a filtered projection of a table as CSV
    Export {
        /// Path to the explorer YAML config
        config_path: PathBuf,
        /// Model family (hotcore or cshock)
        family: String,
        /// Keep only records of this stage (e.g. warmup, post-shock)
        #[arg(long)]
        stage: Option<String>,
        /// Membership filter, e.g. zeta=10,100 (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Columns and species to export (default: all)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        /// Export the abundance ratio A/B per record instead of columns
        #[arg(long, conflicts_with = "columns")]
        ratio: Option<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the species catalog by phase
    Species {
        /// Leave complex organic molecules out
        #[arg(long)]
        exclude_coms: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cmz_cli=info,cmz_extract=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Extract {
            config_path,
            parallel,
        } => cmd_extract(&config_path, parallel),
        Commands::Summary {
            config_path,
            family,
        } => cmd_summary(&config_path, family.as_deref()),
        Commands::Export {
            config_path,
            family,
            stage,
            filters,
            columns,
            ratio,
            output,
        } => cmd_export(
            &config_path,
            &family,
            stage.as_deref(),
            &filters,
            &columns,
            ratio.as_deref(),
            output.as_deref(),
        ),
        Commands::Species { exclude_coms } => {
            cmd_species(exclude_coms);
            Ok(())
        }
    }
}

fn parse_family(name: &str) -> AppResult<ModelFamily> {
    name.parse()
        .map_err(|e: cmz_core::CoreError| AppError::InvalidInput(e.to_string()))
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating grid for: {}", config_path.display());
    let config = load_config(config_path)?;
    let overview = extract_service::inspect_grid(&config)?;

    println!("✓ Catalog is valid ({} runs)", overview.run_count);
    for family in &overview.families {
        println!(
            "  {}: {} runs with series, {} without",
            family.family, family.candidates, family.unavailable
        );
    }
    Ok(())
}

fn cmd_extract(config_path: &Path, parallel: bool) -> AppResult<()> {
    let mut config = load_config(config_path)?;
    config.parallel |= parallel;
    println!(
        "Extracting tables from {} into {}",
        config.grid_dir.display(),
        config.output_dir.display()
    );

    let response = extract_service::regenerate_from_config(&config)?;
    for family in ModelFamily::ALL {
        let manifest = response.manifest(family);
        let report = &manifest.report;
        println!(
            "✓ {}: {} records from {} runs ({} rejected, {} unavailable)",
            family,
            manifest.record_count,
            manifest.run_count,
            report.rejected_runs(),
            report.unavailable_runs
        );
        for (kind, count) in &report.rejections {
            println!("    {}: {}", kind, count);
        }
    }
    println!("Completed in {:.2} s", response.elapsed_s);
    Ok(())
}

fn cmd_summary(config_path: &Path, family: Option<&str>) -> AppResult<()> {
    let config = load_config(config_path)?;
    let families = match family {
        Some(name) => vec![parse_family(name)?],
        None => ModelFamily::ALL.to_vec(),
    };

    for family in families {
        let table = extract_service::load_table(&config, family)?;
        let summary = table_summary(&table);
        println!("\n{} table:", summary.family);
        println!("  Records: {}", summary.record_count);
        println!("  Runs: {}", summary.run_count);
        if let Some((lo, hi)) = summary.age_range {
            println!("  Age range: {:.3e} - {:.3e} yr", lo, hi);
        }
        println!("  Stages:");
        for (stage, count) in &summary.stage_counts {
            println!("    {}: {}", stage, count);
        }
    }
    Ok(())
}

fn cmd_export(
    config_path: &Path,
    family: &str,
    stage: Option<&str>,
    filters: &[String],
    columns: &[String],
    ratio: Option<&str>,
    output: Option<&Path>,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let family = parse_family(family)?;
    let table = extract_service::load_table(&config, family)?;

    let mut filter = RecordFilter::new();
    for arg in filters {
        let (column, values) = parse_filter(arg)?;
        filter = filter.with(column, values)?;
    }
    for (column, value) in filter.off_grid(family) {
        warn!(column = column.name(), value, "value is not a grid point");
    }

    let records = match stage {
        Some(label) => {
            let stage: Stage = label
                .parse()
                .map_err(|e: cmz_core::CoreError| AppError::InvalidInput(e.to_string()))?;
            if !stage.belongs_to(family) {
                return Err(AppError::InvalidInput(format!(
                    "Stage {} does not apply to {} runs",
                    stage, family
                )));
            }
            filter.apply(segment(&table, stage))
        }
        None => filter.apply(table.records()),
    };

    let csv = match ratio {
        Some(arg) => {
            let (numerator, denominator) = parse_ratio(arg)?;
            let points = species_ratio(&table, &records, &numerator, &denominator)?;
            ratio_csv(&points, &numerator, &denominator)
        }
        None => {
            let (columns, species) = resolve_columns(&table, columns)?;
            project_csv(&records, &columns, &species)
        }
    };

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} records to {}", records.len(), path.display());
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_species(exclude_coms: bool) {
    let selected = if exclude_coms {
        species::excluding_coms()
    } else {
        species::all()
    };

    for phase in Phase::ALL {
        let names: Vec<&str> = selected
            .iter()
            .filter(|name| Phase::of(name) == phase)
            .map(String::as_str)
            .collect();
        println!("{} ({}):", phase.label(), names.len());
        println!("  {}", names.join(", "));
    }
}
