//! `rkw`: keyword frequency and sentiment statistics over review dumps.
//!
//! Usage:
//!   rkw extract reviews.jsonl --top-n 30
//!   rkw analyze reviews.jsonl --analyzer-cmd "python3 okt_nouns.py" --min-reviews 5
//!   rkw analyze reviews.jsonl --platform naver --category audio
//!   rkw reviews reviews.jsonl --keyword 배터리 --label negative --sort lowest
//!   rkw compare reviews.jsonl 배터리 소음 가격 --since 2024-01-01
//!   rkw sentiment reviews.jsonl --product P123 --json
//!   rkw completions bash

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use review_keywords::engine::MAX_COMPARED_KEYWORDS;
use review_keywords::format::{load_records, render_comparison, render_table, write_json};
use review_keywords::{
    compare_keywords, find_reviews, parse_cutoff, summarize_reviews, AnalysisConfig,
    CommandAnalyzer, KeywordPipeline, KwResult, LogObserver, MorphAnalyzer, RecordFilter,
    ReviewQuery, ReviewSort, ReviewSummary, SentimentBreakdown, SentimentLabel, StopWordAnalyzer,
    TextRecord, WhitespaceAnalyzer,
};

#[derive(Parser)]
#[command(name = "rkw")]
#[command(about = "Keyword frequency and per-keyword sentiment statistics for reviews", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the most frequent analyzer tokens
    Extract {
        /// JSON Lines file of review records
        file: PathBuf,
        #[command(flatten)]
        opts: AnalysisOpts,
    },
    /// Extract keywords, then compute review count, positive rate and rating per keyword
    Analyze {
        file: PathBuf,
        #[command(flatten)]
        opts: AnalysisOpts,
    },
    /// List reviews mentioning a keyword
    Reviews {
        file: PathBuf,
        /// Keyword to look for (case-insensitive)
        #[arg(long, short)]
        keyword: String,
        /// Only these labels (repeatable)
        #[arg(long = "label")]
        labels: Vec<SentimentLabel>,
        #[arg(long, default_value_t = 1)]
        min_star: u8,
        #[arg(long, default_value_t = 5)]
        max_star: u8,
        /// newest | highest | lowest | positive
        #[arg(long, default_value = "newest")]
        sort: ReviewSort,
        #[arg(long, default_value_t = review_keywords::engine::DEFAULT_REVIEW_LIMIT)]
        limit: usize,
        #[command(flatten)]
        scope: ScopeOpts,
        #[arg(long)]
        json: bool,
    },
    /// Compare review count, positive rate and rating for 2 to 5 keywords
    Compare {
        file: PathBuf,
        #[arg(required = true, num_args = 2..=MAX_COMPARED_KEYWORDS)]
        keywords: Vec<String>,
        /// Count reviews created on or after this date as recent (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_cutoff)]
        since: Option<DateTime<Utc>>,
        #[command(flatten)]
        scope: ScopeOpts,
        #[arg(long)]
        json: bool,
    },
    /// Count reviews per predicted label, with accuracy where `is_correct` is present
    Sentiment {
        file: PathBuf,
        #[command(flatten)]
        scope: ScopeOpts,
        #[arg(long)]
        json: bool,
    },
    /// Print a shell completion script
    Completions { shell: Shell },
}

/// Which records to analyse. Repeat a flag to allow several values.
#[derive(Args)]
struct ScopeOpts {
    #[arg(long = "platform")]
    platforms: Vec<String>,
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Only this product's reviews
    #[arg(long = "product")]
    product_id: Option<String>,
}

impl ScopeOpts {
    fn filter(&self) -> RecordFilter {
        RecordFilter {
            platforms: self.platforms.clone(),
            categories: self.categories.clone(),
            product_id: self.product_id.clone(),
        }
    }

    fn load(&self, file: &Path) -> KwResult<Vec<TextRecord>> {
        let mut records = load_records(file)?;
        self.filter().retain(&mut records);
        Ok(records)
    }
}

#[derive(Args)]
struct AnalysisOpts {
    /// TOML file with analysis options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    top_n: Option<usize>,
    #[arg(long)]
    min_length: Option<usize>,
    #[arg(long)]
    batch_size: Option<usize>,
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Drop keywords found in fewer reviews than this
    #[arg(long)]
    min_reviews: Option<usize>,
    /// External analyzer: reads text on stdin, prints one token per line
    #[arg(long)]
    analyzer_cmd: Option<String>,
    /// Use the built-in English stop-word analyzer instead of plain whitespace
    #[arg(long, conflicts_with = "analyzer_cmd")]
    stop_words: bool,
    #[command(flatten)]
    scope: ScopeOpts,
    #[arg(long)]
    json: bool,
}

impl AnalysisOpts {
    fn config(&self) -> KwResult<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(v) = self.top_n {
            config.top_n = v;
        }
        if let Some(v) = self.min_length {
            config.min_length = v;
        }
        if let Some(v) = self.batch_size {
            config.batch_size = v;
        }
        if let Some(v) = self.chunk_size {
            config.chunk_size = v;
        }
        if let Some(v) = self.min_reviews {
            config.min_review_count = v;
        }
        config.validate()?;
        Ok(config)
    }

    fn analyzer(&self) -> KwResult<Box<dyn MorphAnalyzer>> {
        if let Some(cmd) = self.analyzer_cmd.as_deref() {
            return Ok(Box::new(CommandAnalyzer::from_command_line(cmd)?));
        }
        if self.stop_words {
            Ok(Box::new(StopWordAnalyzer::new()))
        } else {
            Ok(Box::new(WhitespaceAnalyzer))
        }
    }

    fn pipeline(&self) -> KwResult<KeywordPipeline<Box<dyn MorphAnalyzer>>> {
        KeywordPipeline::new(self.analyzer()?, self.config()?)
    }
}

#[derive(Serialize)]
struct ReviewsOutput<'a> {
    summary: ReviewSummary,
    reviews: Vec<&'a TextRecord>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> KwResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Extract { file, opts } => extract(&file, &opts, &mut out),
        Commands::Analyze { file, opts } => analyze(&file, &opts, &mut out),
        Commands::Reviews {
            file,
            keyword,
            labels,
            min_star,
            max_star,
            sort,
            limit,
            scope,
            json,
        } => {
            let records = scope.load(&file)?;
            let query = ReviewQuery {
                keyword,
                labels,
                min_star,
                max_star,
                sort,
                limit,
            };
            let summary = summarize_reviews(&records, &query);
            let reviews = find_reviews(&records, &query);
            if json {
                return write_json(&mut out, &ReviewsOutput { summary, reviews });
            }
            if summary.matched == 0 {
                writeln!(out, "no reviews mention '{}'", query.keyword)?;
                return Ok(());
            }
            write!(out, "'{}': {} reviews", query.keyword, summary.matched)?;
            if let Some(rate) = summary.positive_rate {
                write!(out, ", {:.1}% positive", rate)?;
            }
            if let Some(rating) = summary.avg_rating {
                write!(out, ", mean {:.2}★", rating)?;
            }
            if let Some(platform) = &summary.top_platform {
                write!(out, ", mostly {}", platform)?;
            }
            writeln!(out)?;
            for r in reviews {
                let date = r
                    .created_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(out, "[{}] {}★ {}  {}", r.pred_label, r.star, date, r.content)?;
            }
            Ok(())
        }
        Commands::Compare {
            file,
            keywords,
            since,
            scope,
            json,
        } => {
            let records = scope.load(&file)?;
            let rows = compare_keywords(&records, &keywords, since);
            if json {
                write_json(&mut out, &rows)
            } else {
                out.write_all(render_comparison(&rows).as_bytes())?;
                Ok(())
            }
        }
        Commands::Sentiment { file, scope, json } => {
            let records = scope.load(&file)?;
            let breakdown = SentimentBreakdown::from_records(&records);
            if json {
                write_json(&mut out, &breakdown)
            } else {
                for label in SentimentLabel::ALL {
                    writeln!(
                        out,
                        "{:<8} {:>8}  {:>5.1}%",
                        label.as_str(),
                        breakdown.count(label),
                        breakdown.share(label)
                    )?;
                }
                if let Some(accuracy) = breakdown.accuracy() {
                    writeln!(out, "accuracy {:>8}  {:>5.1}%", breakdown.judged, accuracy)?;
                }
                Ok(())
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "rkw", &mut out);
            Ok(())
        }
    }
}

fn extract(file: &Path, opts: &AnalysisOpts, out: &mut impl Write) -> KwResult<()> {
    let pipeline = opts.pipeline()?;
    let records = opts.scope.load(file)?;
    let texts: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
    let keywords = pipeline.extract_with(&texts, &LogObserver)?;

    if opts.json {
        return write_json(out, keywords.as_slice());
    }
    for (rank, kw) in keywords.iter().enumerate() {
        writeln!(out, "{:>3}. {}  {}", rank + 1, kw.token, kw.frequency)?;
    }
    Ok(())
}

fn analyze(file: &Path, opts: &AnalysisOpts, out: &mut impl Write) -> KwResult<()> {
    let pipeline = opts.pipeline()?;
    let records = load_records(file)?;
    let report = pipeline.run_scoped_with(&records, &opts.scope.filter(), &LogObserver)?;

    if opts.json {
        return write_json(out, &report);
    }
    if report.stats.is_empty() {
        writeln!(out, "no keywords with matching reviews")?;
        return Ok(());
    }
    out.write_all(render_table(&report.stats).as_bytes())?;

    let s = &report.summary;
    writeln!(out)?;
    writeln!(out, "keywords analysed  {}", s.keyword_count)?;
    if let Some(rate) = s.mean_positive_rate {
        writeln!(out, "mean positive rate {:.1}%", rate)?;
    }
    writeln!(out, "total reviews      {}", s.total_reviews)?;
    if let Some(rating) = s.mean_rating {
        writeln!(out, "mean rating        {:.2}", rating)?;
    }
    Ok(())
}
