use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use adapter::ClipboardMode;
use domain::tree::CommentTreeNode;
use domain::{BoardKey, BoardType, LineTagSegment};
use section::config::Settings;
use section::selection::Rect;
use section::{CommentSection, LoadMore, SectionOptions, SelectionEmitter, SelectionSnapshot};

#[derive(Parser)]
#[command(name = "threadline", about = "Browse review comments and produce line tags")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a board's comment tree.
    Show {
        #[arg(long)]
        board_id: Option<i64>,
        #[arg(long)]
        board_type: Option<String>,
        /// Keep loading until every page is in.
        #[arg(long)]
        all: bool,
    },
    /// Print and copy the line tag for a character range of a file.
    Tag {
        file: PathBuf,
        /// Character offset where the selection starts.
        #[arg(long)]
        start: usize,
        /// Selection length in characters.
        #[arg(long)]
        length: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let settings = Settings::new().context("Failed to load configuration")?;

    match cli.command {
        Command::Show {
            board_id,
            board_type,
            all,
        } => show(&settings, board_id, board_type, all).await,
        Command::Tag {
            file,
            start,
            length,
        } => tag(file, start, length).await,
    }
}

fn resolve_board(
    settings: &Settings,
    board_id: Option<i64>,
    board_type: Option<String>,
) -> anyhow::Result<BoardKey> {
    let configured = settings.board.as_ref();
    let id = board_id
        .or(configured.map(|b| b.id))
        .context("No board id given (use --board-id or THREADLINE_BOARD__ID)")?;
    let kind = board_type
        .or(configured.map(|b| b.board_type.clone()))
        .context("No board type given (use --board-type or THREADLINE_BOARD__BOARD_TYPE)")?;
    let kind = BoardType::new(kind).context("Invalid board type")?;
    Ok(BoardKey::new(id, kind))
}

async fn show(
    settings: &Settings,
    board_id: Option<i64>,
    board_type: Option<String>,
    all: bool,
) -> anyhow::Result<()> {
    let board = resolve_board(settings, board_id, board_type)?;
    let api = adapter::connect_api(settings.http()).context("Failed to create API client")?;
    let section = CommentSection::new(
        api,
        SectionOptions {
            page: settings.page_options(),
            engagement: settings.engagement_options(),
            viewer: settings.viewer_options(),
        },
    );

    section
        .load_initial(board.clone())
        .await
        .with_context(|| format!("Failed to load comments for {}", board))?;

    if all {
        while let LoadMore::Loaded { added, .. } = section.load_more().await? {
            info!("Fetched {} more", added);
        }
    }

    println!("{} comment(s) on {}", section.total_count(), board);
    for node in section.tree() {
        print_node(&node, 0);
        for reply in &node.replies {
            print_node(reply, 1);
        }
    }
    if section.has_next() {
        println!("(more comments available, rerun with --all)");
    }
    Ok(())
}

fn print_node(node: &CommentTreeNode, depth: usize) {
    let indent = "    ".repeat(depth);
    let record = &node.record;
    println!(
        "{}- [{}] {} ({} like{}{})",
        indent,
        record.created_at,
        record.author_name,
        record.like_count,
        if record.like_count == 1 { "" } else { "s" },
        if record.is_liked_by_viewer { ", liked" } else { "" },
    );
    for line in record.body.lines() {
        println!("{}  {}", indent, line);
    }
    let tags: Vec<String> = record
        .segments()
        .iter()
        .filter_map(LineTagSegment::range)
        .map(|r| format!("lines {}-{}", r.start_line, r.end_line))
        .collect();
    if !tags.is_empty() {
        println!("{}  -> {}", indent, tags.join(", "));
    }
}

async fn tag(file: PathBuf, start: usize, length: usize) -> anyhow::Result<()> {
    let listing = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let text: String = listing.chars().skip(start).take(length).collect();
    if text.is_empty() {
        bail!("Selection is empty (file has {} characters)", listing.chars().count());
    }

    let mut emitter = SelectionEmitter::new(listing, adapter::clipboard(ClipboardMode::System))
        .on_message(Arc::new(|message: &str| info!("{}", message)));
    emitter.on_selection_change(Some(SelectionSnapshot {
        anchor_in_listing: true,
        focus_in_listing: true,
        start_offset: start,
        text,
        bounds: Rect::default(),
    }));

    match emitter.copy_tag().await {
        Some(tag) => println!("{}", tag),
        None => bail!("Nothing selected"),
    }
    Ok(())
}
