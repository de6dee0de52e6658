use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use docket::build::{build_document_set, stamp, today, write_document_set};
use docket::chat::{Conversation, RelayConfig};
use docket::store::{FileSource, LibraryEntry, SourceGroup};
use docket::{
    match_label, Config, Error, LoadError, SearchContext, SearchOptions, SearchResult,
    SearchSession, StoreStats,
};

mod cli;
use cli::display::*;
use cli::{Cli, Commands, RelayKind};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCKET_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> docket::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Search {
            file,
            query,
            exact,
            case_sensitive,
            limit,
            json,
        } => {
            let options = SearchOptions {
                case_insensitive: config.search.case_insensitive && !case_sensitive,
                exact_match: config.search.exact_match || exact,
            };
            run_search(&file, config, &query, options, limit, json)
        }
        Commands::Inspect { file, json } => inspect(&file, config, json),
        Commands::Lookup { file, token } => {
            lookup(&open(&file, config), &token);
            Ok(())
        }
        Commands::Context { file, message } => {
            println!("{}", open(&file, config).context_block(&message));
            Ok(())
        }
        Commands::Chat {
            file,
            message,
            upstream,
            reply,
            status,
        } => chat(&open(&file, config), &message, upstream, reply.as_deref(), status),
        Commands::Explain { file, query, rank } => explain(&file, config, &query, rank),
        Commands::Build { dir, output, date } => {
            build(&dir, &output, date.map(stamp).unwrap_or_else(today))
        }
    }
}

/// Load fail-soft. A failure is already logged at `warn`; we continue empty.
fn open(file: &Path, config: Config) -> SearchContext {
    let (ctx, _warning) = SearchContext::load(&FileSource::new(file), config);
    ctx
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> docket::Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::Serialize)
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct JsonHit<'a> {
    rank: usize,
    #[serde(flatten)]
    result: &'a SearchResult,
    excerpt: String,
}

fn run_search(
    file: &Path,
    config: Config,
    query: &str,
    options: SearchOptions,
    limit: Option<usize>,
    json: bool,
) -> docket::Result<()> {
    let min_latency = config.min_latency();
    let session = SearchSession::new(open(file, config));

    let started = Instant::now();
    let pending = match session.begin(query, options) {
        Ok(pending) => pending,
        Err(e) => {
            println!("{}", notice(e.user_message()));
            return Ok(());
        }
    };
    let completed = pending.run();
    let elapsed = started.elapsed();
    if let Some(rest) = min_latency.checked_sub(elapsed) {
        std::thread::sleep(rest);
    }

    let Some(published) = session.publish(completed) else {
        return Ok(());
    };
    let ctx = session.context();
    let shown = limit.unwrap_or(published.results.len());
    let query_text = published.query.text();

    tracing::debug!(
        results = published.results.len(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "search timing"
    );

    if json {
        let hits: Vec<JsonHit> = published
            .results
            .iter()
            .take(shown)
            .enumerate()
            .map(|(i, result)| JsonHit {
                rank: i + 1,
                result,
                excerpt: ctx.excerpt_with(result, query_text, &docket::excerpt::Plain),
            })
            .collect();
        println!("{}", to_json(&hits)?);
        return Ok(());
    }

    let markup = TerminalMarkup::detect();
    println!("{}", themed(BRIGHT_CYAN, &[BOLD], &published.summary(&markup)));
    println!();

    for (i, result) in published.results.iter().take(shown).enumerate() {
        let doc = &result.document;
        println!(
            "{} {} {}",
            rank_label(i + 1),
            themed(CYAN, &[BOLD], &sanitize(&doc.title)),
            match_badge(result.relevance, &match_label(result.relevance))
        );

        let mut meta = format!("Source: {}", sanitize(&doc.source));
        if let Some(date) = &doc.date {
            meta.push_str(&format!("  Date: {}", sanitize(date)));
        }
        println!("     {}", themed(GRAY, &[DIM], &meta));

        for line in wrap(&ctx.excerpt_with(result, query_text, &markup), BOX_WIDTH - 5) {
            println!("     {}", line);
        }
        println!();
    }

    let hidden = published.results.len().saturating_sub(shown);
    if hidden > 0 {
        println!("{}", themed(GRAY, &[], &format!("... and {} more", hidden)));
    }
    println!(
        "{}",
        themed(
            GRAY,
            &[],
            &format!("searched {} documents in ", ctx.store().len())
        ) + &timing_ms(elapsed.as_secs_f64() * 1000.0)
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT / LOOKUP
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct Inspection {
    stats: StoreStats,
    cases: Vec<SourceGroup>,
    library: Vec<LibraryEntry>,
}

fn inspect(file: &Path, config: Config, json: bool) -> docket::Result<()> {
    let ctx = open(file, config);
    let inspection = Inspection {
        stats: ctx.stats(),
        cases: ctx.store().by_source(),
        library: ctx.store().library(),
    };

    if json {
        println!("{}", to_json(&inspection)?);
        return Ok(());
    }

    let file_size = std::fs::metadata(file)
        .map(|m| format_size(m.len() as usize))
        .unwrap_or_else(|_| "missing".to_string());

    double_header();
    title("DOCKET STORE");
    double_footer();

    section_top("STORE");
    row_kv("File", &truncate_text(&file.display().to_string(), 58));
    row_kv("Size", &file_size);
    row_kv("Documents", &inspection.stats.documents.to_string());
    row_kv("Index tokens", &inspection.stats.tokens.to_string());
    row_kv("Characters", &inspection.stats.total_chars.to_string());
    row_kv("Avg per doc", &inspection.stats.average_chars.to_string());
    row_kv("Last updated", inspection.stats.last_updated_label());

    section_mid("CASES");
    if inspection.cases.is_empty() {
        row(&format!("  {}", notice("No documents loaded yet.")));
    }
    for group in &inspection.cases {
        row(&format!(
            "  {} {}",
            pad_right(&truncate_text(&sanitize(&group.case), 60), 60),
            themed(GRAY, &[], &format!("{} documents", group.count))
        ));
    }

    section_mid("LIBRARY");
    for entry in &inspection.library {
        let date = entry.date.as_deref().map(sanitize).unwrap_or_default();
        row(&format!(
            "  {} {} {}",
            themed(MAGENTA, &[], &format!("{:>4}.", entry.number)),
            pad_right(&truncate_text(&sanitize(&entry.title), 44), 44),
            themed(GRAY, &[], &truncate_text(&date, 24))
        ));
    }
    section_bot();
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILD
// ═══════════════════════════════════════════════════════════════════════════

fn build(dir: &Path, output: &Path, last_updated: String) -> docket::Result<()> {
    let started = Instant::now();
    let report = build_document_set(dir, last_updated)?;
    write_document_set(&report.set, output)?;

    println!(
        "{} {} documents to {} {}",
        themed(GREEN, &[BOLD], "Wrote"),
        report.set.documents.len(),
        sanitize(&output.display().to_string()),
        timing_ms(started.elapsed().as_secs_f64() * 1000.0)
    );
    if !report.failed.is_empty() {
        println!(
            "{}",
            themed(YELLOW, &[], &format!("No text in {} files:", report.failed.len()))
        );
        for name in &report.failed {
            println!("  {}", themed(GRAY, &[], &sanitize(name)));
        }
    }
    Ok(())
}

fn lookup(ctx: &SearchContext, token: &str) {
    let positions = ctx.index().lookup(token);
    println!(
        "{} {} {}",
        themed(CYAN, &[BOLD], &sanitize(token)),
        themed(GRAY, &[], "→"),
        match_badge(
            positions.len(),
            &format!(
                "{} document{}",
                positions.len(),
                if positions.len() == 1 { "" } else { "s" }
            )
        )
    );
    for position in positions {
        if let Some(doc) = ctx.store().get(position) {
            println!("  {} {}", rank_label(position + 1), sanitize(&doc.title));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CHAT / EXPLAIN
// ═══════════════════════════════════════════════════════════════════════════

fn chat(
    ctx: &SearchContext,
    message: &str,
    upstream: Option<RelayKind>,
    reply: Option<&Path>,
    status: u16,
) -> docket::Result<()> {
    let mut conversation = Conversation::new();
    let Some(request) = conversation.ask(ctx, message) else {
        return Ok(());
    };

    if let Some(path) = reply {
        let body = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match conversation.receive(status, &body) {
            Ok(answer) => println!("{}", answer),
            Err(e) => println!("{}", notice(&e.user_message())),
        }
        return Ok(());
    }

    match upstream {
        Some(kind) => {
            let relay = match kind {
                RelayKind::Server => RelayConfig::server(),
                RelayKind::Serverless => RelayConfig::serverless(),
            };
            println!("{}", to_json(&relay.upstream_request(request.messages))?);
        }
        None => println!("{}", to_json(&request)?),
    }
    Ok(())
}

fn explain(file: &Path, config: Config, query: &str, rank: usize) -> docket::Result<()> {
    let options = config.search;
    let session = SearchSession::new(open(file, config));
    if let Err(e) = session.search(query, options) {
        println!("{}", notice(e.user_message()));
        return Ok(());
    }

    let request = rank
        .checked_sub(1)
        .ok_or(docket::ChatError::NoSuchResult(0))
        .and_then(|position| session.explain_request(position));
    match request {
        Ok(request) => println!("{}", to_json(&request)?),
        Err(e) => println!("{}", notice(&e.user_message())),
    }
    Ok(())
}
