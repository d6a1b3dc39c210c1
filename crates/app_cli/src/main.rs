use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use jelly_core::{
    AppConfig, BatchResult, Classifier, GalleryAssets, MobileNetOrt, ScanOptions, species,
};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "jellyid", about = "Identify jellyfish species on photos", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify images (or folders of images) and export the results
    Classify {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Write the tabular export to this path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the narrative export to this path
        #[arg(long)]
        html: Option<PathBuf>,
        /// Print results as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Recurse into subdirectories
        #[arg(long)]
        recursive: bool,
        /// Model artifact path (overrides the config file)
        #[arg(long)]
        model: Option<PathBuf>,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Species gallery directory for the narrative export
        #[arg(long)]
        gallery: Option<PathBuf>,
    },
    /// Print the evaluation metrics snapshot
    Metrics,
    /// Print the species reference table
    Species,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Classify {
            inputs,
            csv,
            html,
            json,
            recursive,
            model,
            config,
            gallery,
        } => run_classify(ClassifyArgs {
            inputs,
            csv,
            html,
            json,
            recursive,
            model,
            config,
            gallery,
        }),
        Command::Metrics => {
            print_metrics();
            Ok(())
        }
        Command::Species => {
            print_species();
            Ok(())
        }
    }
}

struct ClassifyArgs {
    inputs: Vec<PathBuf>,
    csv: Option<PathBuf>,
    html: Option<PathBuf>,
    json: bool,
    recursive: bool,
    model: Option<PathBuf>,
    config: Option<PathBuf>,
    gallery: Option<PathBuf>,
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(model) = args.model {
        cfg.classifier.model_path = model;
    }
    if let Some(dir) = args.gallery {
        cfg.gallery_dir = Some(dir);
    }

    let files = collect_files(&args.inputs, args.recursive)?;
    if files.is_empty() {
        bail!("no images found in the given inputs");
    }

    // A missing artifact degrades to a predictions-off run instead of
    // aborting the session.
    let classifier = match MobileNetOrt::load(&cfg.classifier) {
        Ok(clf) => Some(clf),
        Err(e) => {
            warn!("{e}; continuing without predictions");
            eprintln!("warning: {e}; no predictions will be produced");
            None
        }
    };

    let batch = jelly_core::classify_batch(
        classifier.as_ref().map(|c| c as &dyn Classifier),
        &files,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_batch(&batch);
    }

    for skip in &batch.skipped {
        eprintln!("skipped {}: {}", skip.file.display(), skip.reason);
    }

    if batch.is_empty() {
        bail!("no images classified");
    }

    if let Some(path) = &args.csv {
        jelly_core::write_tabular(&batch, path)
            .with_context(|| format!("could not write {}", path.display()))?;
        println!("CSV export written to {}", path.display());
    }
    if let Some(path) = &args.html {
        let gallery = cfg
            .gallery_dir
            .as_ref()
            .map(GalleryAssets::scan)
            .unwrap_or_default();
        jelly_core::write_narrative(&batch, &gallery, path)
            .with_context(|| format!("could not write {}", path.display()))?;
        println!("HTML report written to {}", path.display());
    }
    Ok(())
}

fn collect_files(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = jelly_core::scan_folder_with(input, ScanOptions { recursive })?;
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn print_batch(batch: &BatchResult) {
    for item in &batch.items {
        let tier = item.prediction.tier();
        let filename = item
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.file.to_string_lossy().into_owned());
        println!(
            "{:<32} {:>5.1}%  {:<8}  {} {}",
            filename,
            item.prediction.confidence * 100.0,
            tier.label(),
            item.species.emoji,
            item.species.display_name,
        );
        if tier != jelly_core::ConfidenceTier::High {
            println!("{:<32} note: {}", "", tier.advisory());
        }
    }
    let counts = batch.tier_counts();
    println!(
        "\n{} classified (high {}, moderate {}, low {}), {} skipped",
        batch.items.len(),
        counts.high,
        counts.moderate,
        counts.low,
        batch.skipped.len(),
    );
}

fn print_metrics() {
    let snapshot = &jelly_core::EVALUATION;
    println!(
        "Held-out evaluation: {} images, accuracy {:.1}%, macro F1 {:.3}\n",
        snapshot.total(),
        snapshot.accuracy() * 100.0,
        snapshot.macro_f1(),
    );
    println!(
        "{:<26} {:>9} {:>9} {:>9} {:>8}",
        "Species", "Precision", "Recall", "F1", "Support"
    );
    for m in snapshot.per_class() {
        let name = species::lookup(m.identifier)
            .map(|r| r.display_name)
            .unwrap_or(m.identifier);
        println!(
            "{:<26} {:>9.3} {:>9.3} {:>9.3} {:>8}",
            name, m.precision, m.recall, m.f1, m.support
        );
    }
}

fn print_species() {
    for record in species::all() {
        println!(
            "{} {} ({})",
            record.emoji, record.display_name, record.scientific
        );
        println!("   habitat: {}", record.habitat);
        println!("   size:    {}", record.size);
        println!("   danger:  {}", record.danger.label());
        println!("   {}", record.fact);
        println!();
    }
}
