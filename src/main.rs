use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use floorplan_extractor::batch::{BatchOptions, BatchRunner};
use floorplan_extractor::config::{load_config, PipelineConfig};
use floorplan_extractor::image::io::{save_rgba_png, write_json_file};
use floorplan_extractor::processor::HEADING_ROLE;
use floorplan_extractor::sections::select_section;
use floorplan_extractor::types::SectionSummary;
use floorplan_extractor::{
    align_to_north, AutoRenderer, FloorplanProcessor, OrientationStore, PageRenderer,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "floorplan")]
#[command(about = "Extract headings and building outlines from floorplan PDFs")]
struct Cli {
    /// Pipeline configuration (JSON); defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Measure the heading of every PDF in a directory.
    Batch(BatchArgs),
    /// Heading and north-aligned outline of a single document.
    Page(PageArgs),
    /// Dump every section crop of a document for checking template indices.
    Sections(SectionsArgs),
}

#[derive(Args, Debug)]
struct BatchArgs {
    dir: PathBuf,
    /// Orientation map (JSON); existing keys are not re-measured.
    #[arg(long, default_value = "orientations.json")]
    out: PathBuf,
    /// Also write north-aligned outlines as `<key>.png` here.
    #[arg(long)]
    outlines: Option<PathBuf>,
    /// Record failing documents and continue instead of aborting.
    #[arg(long)]
    keep_going: bool,
}

#[derive(Args, Debug)]
struct PageArgs {
    /// PDF, or an already rendered page image.
    input: PathBuf,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct SectionsArgs {
    input: PathBuf,
    #[arg(long, default_value = "sections")]
    out_dir: PathBuf,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let renderer = AutoRenderer::new(config.render.clone());
    let processor = FloorplanProcessor::new(config)?;

    match cli.cmd {
        Command::Batch(args) => run_batch(renderer, processor, args),
        Command::Page(args) => run_page(&renderer, &processor, args),
        Command::Sections(args) => run_sections(&renderer, &processor, args),
    }
}

fn run_batch(renderer: AutoRenderer, processor: FloorplanProcessor, args: BatchArgs) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir.display());
    }
    let store = OrientationStore::new(&args.out);
    let map = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;

    let options = BatchOptions {
        fail_fast: !args.keep_going,
        outline_dir: args.outlines,
    };
    let runner = BatchRunner::new(renderer, processor, options);
    let summary = runner
        .run(&args.dir, map, Some(&store))
        .with_context(|| format!("batch aborted; progress kept in {}", store.path().display()))?;

    println!(
        "{} measured, {} skipped, {} failed -> {} ({} keys)",
        summary.processed.len(),
        summary.skipped.len(),
        summary.failed.len(),
        store.path().display(),
        summary.map.len()
    );
    for failure in &summary.failed {
        println!("  failed {}: {}", failure.path.display(), failure.error);
    }
    Ok(())
}

fn run_page(renderer: &AutoRenderer, processor: &FloorplanProcessor, args: PageArgs) -> Result<()> {
    let page = render(renderer, &args.input)?;
    let t0 = Instant::now();
    let sections = processor.sections(&page);
    let heading = processor
        .heading_from_sections(&sections)
        .with_context(|| format!("no heading in {}", args.input.display()))?;
    let outline = processor
        .outline_from_sections(&sections)
        .with_context(|| format!("no outline in {}", args.input.display()))?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    let heading_section = select_section(
        &sections,
        processor.config().template.heading_index,
        HEADING_ROLE,
    )?;
    save_rgba_png(&heading_section.image, &args.out_dir.join("heading.png"))?;
    save_rgba_png(
        &align_to_north(&outline, &heading),
        &args.out_dir.join("outline.png"),
    )?;

    println!(
        "Heading: {:.2}° ({} sections, {:.1} ms)",
        heading.degrees,
        sections.len(),
        elapsed_ms
    );
    println!("Saved outline and heading crops to {}", args.out_dir.display());
    Ok(())
}

fn run_sections(
    renderer: &AutoRenderer,
    processor: &FloorplanProcessor,
    args: SectionsArgs,
) -> Result<()> {
    let page = render(renderer, &args.input)?;
    let sections = processor.sections(&page);
    let mut summaries: Vec<SectionSummary> = Vec::with_capacity(sections.len());
    for (i, section) in sections.iter().enumerate() {
        save_rgba_png(&section.image, &args.out_dir.join(format!("section_{i}.png")))?;
        summaries.push(section.summary(i));
    }
    write_json_file(&args.out_dir.join("sections.json"), &summaries)?;
    println!(
        "Saved {} sections to {}",
        sections.len(),
        args.out_dir.display()
    );
    Ok(())
}

fn render(renderer: &AutoRenderer, input: &Path) -> Result<image::RgbaImage> {
    renderer
        .render_first_page(input)
        .with_context(|| format!("failed to render {}", input.display()))
}
