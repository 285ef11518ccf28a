use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graph::{
    load_commits, Commit, Config, GitWalker, GraphLayoutEngine, RowGraphData, SvgRenderer,
    TextRenderer,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitgraph")]
#[command(about = "Lay out and draw a commit graph", long_about = None)]
struct Cli {
    /// Path to the repository (discovered from the environment if omitted)
    #[arg(long, conflicts_with = "input")]
    repo: Option<PathBuf>,
    /// Read commits from a JSON file instead of a repository
    #[arg(long)]
    input: Option<PathBuf>,
    /// HEAD commit when reading from --input
    #[arg(long, requires = "input")]
    head: Option<String>,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Maximum number of commits to load
    #[arg(short, long)]
    limit: Option<usize>,
    /// Commits laid out per page
    #[arg(long)]
    page_size: Option<usize>,
    /// Mute merge commits
    #[arg(long)]
    mute_merges: bool,
    /// Mute commits that are not ancestors of HEAD
    #[arg(long)]
    mute_non_ancestors: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print per-row layout data as JSON
    Layout,
    /// Render the graph as SVG
    Svg {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Row to expand for commit details
        #[arg(long)]
        expand: Option<usize>,
    },
    /// Print the graph to the terminal
    Show {
        /// Colour lanes with ANSI escapes
        #[arg(long)]
        color: bool,
    },
}

/// Commits and rows laid out so far
struct Graph {
    head: Option<String>,
    commits: Vec<Commit>,
    rows: Vec<RowGraphData>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.page_size = config.page_size.max(1);
    config.mute.merge_commits |= cli.mute_merges;
    config.mute.commits_not_ancestors_of_head |= cli.mute_non_ancestors;

    let graph = match &cli.input {
        Some(path) => layout_file(path, cli.head.clone(), cli.limit, &config)?,
        None => layout_repository(cli.repo.as_deref(), cli.limit, &config)?,
    };
    tracing::info!(rows = graph.rows.len(), "layout complete");

    match cli.command {
        Commands::Layout => {
            println!("{}", serde_json::to_string_pretty(&graph.rows)?);
        }
        Commands::Svg { output, expand } => {
            let svg = SvgRenderer::new(&config.graph)
                .with_expanded_row(expand)
                .render(&graph.rows);
            match output {
                Some(path) => std::fs::write(&path, svg)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{}", svg),
            }
        }
        Commands::Show { color } => {
            let renderer = TextRenderer::default().with_ansi(color);
            print!("{}", renderer.render(&graph.commits, &graph.rows, graph.head.as_deref()));
        }
    }

    Ok(())
}

fn layout_file(
    path: &Path,
    head: Option<String>,
    limit: Option<usize>,
    config: &Config,
) -> Result<Graph> {
    let mut commits =
        load_commits(path).with_context(|| format!("Failed to read commits {}", path.display()))?;
    if let Some(limit) = limit {
        commits.truncate(limit);
    }

    let mut engine = new_engine(head.as_deref(), config);
    let mut rows = Vec::with_capacity(commits.len());
    for page in commits.chunks(config.page_size) {
        rows.extend(engine.append(page));
    }
    engine.finish();

    Ok(Graph { head, commits, rows })
}

fn layout_repository(path: Option<&Path>, limit: Option<usize>, config: &Config) -> Result<Graph> {
    let walker = match path {
        Some(path) => GitWalker::open(path)
            .with_context(|| format!("Failed to open repository {}", path.display()))?,
        None => GitWalker::open_from_env().context("Failed to discover a repository")?,
    };
    let head = walker.head()?;

    let mut engine = new_engine(head.as_deref(), config);
    let mut graph = Graph {
        head,
        commits: Vec::new(),
        rows: Vec::new(),
    };

    let mut pages = walker.pages()?;
    let mut loaded = 0;
    loop {
        let wanted = match limit {
            Some(limit) if loaded >= limit => break,
            Some(limit) => config.page_size.min(limit - loaded),
            None => config.page_size,
        };
        let page = pages.next_page(Some(wanted))?;
        let real = page.iter().filter(|c| !c.is_uncommitted()).count();

        graph.rows.extend(engine.append(&page));
        graph.commits.extend(page);
        loaded += real;
        if real < wanted {
            break;
        }
    }
    engine.finish();

    Ok(graph)
}

fn new_engine(head: Option<&str>, config: &Config) -> GraphLayoutEngine {
    GraphLayoutEngine::with_palette_size(head, config.mute, config.graph.palette_size())
}
