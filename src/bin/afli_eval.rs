//! `afli-eval`: drive an [`Afli`] or [`Nfl`] index end-to-end from a
//! workload file (§6 CLI surface).
//!
//! `afli-eval evaluate <index-name> <batch-size> <workload-path>
//! <key-type> [<config-path>] [<show-incremental>]`
//!
//! `<index-name>` is `afli` for the plain index or `nfl` to route batches
//! through the numerical-flow wrapper, which requires `nf_weights_path`
//! in the config file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use afli::{config::Config, index::Afli, nf::Nfl, workload};

#[derive(Parser)]
#[command(name = "afli-eval")]
pub struct Opt {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// Run a workload file against a freshly built index and report stats.
    Evaluate {
        /// Which index to build: `afli` or `nfl`.
        index_name: String,
        /// Number of records transformed/applied per batch.
        batch_size: usize,
        /// Path to a binary workload file (§6 record format).
        workload_path: PathBuf,
        /// One of: i32, i64, u32, u64.
        key_type: String,
        /// Optional TOML hyper-parameter override (§6 `<config-path>`).
        config_path: Option<PathBuf>,
        /// Print stats after every batch instead of only at the end.
        show_incremental: Option<bool>,
    },
}

fn main() {
    let opts = Opt::parse();
    env_logger::init();

    if let Err(err) = handle(opts) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn handle(opts: Opt) -> anyhow::Result<()> {
    match opts.subcmd {
        SubCommand::Evaluate {
            index_name,
            batch_size,
            workload_path,
            key_type,
            config_path,
            show_incremental,
        } => evaluate(
            &index_name,
            batch_size,
            &workload_path,
            &key_type,
            config_path,
            show_incremental.unwrap_or(false),
        ),
    }
}

fn evaluate(
    index_name: &str,
    batch_size: usize,
    workload_path: &std::path::Path,
    key_type: &str,
    config_path: Option<PathBuf>,
    show_incremental: bool,
) -> anyhow::Result<()> {
    let cfg = match config_path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    log::info!("evaluating index={} key_type={} batch_size={}", index_name, key_type, batch_size);

    match index_name {
        "afli" => match key_type {
            "i32" => run_afli::<i32>(workload_path, batch_size, &cfg, show_incremental),
            "i64" => run_afli::<i64>(workload_path, batch_size, &cfg, show_incremental),
            "u32" => run_afli::<u32>(workload_path, batch_size, &cfg, show_incremental),
            "u64" => run_afli::<u64>(workload_path, batch_size, &cfg, show_incremental),
            other => anyhow::bail!("unsupported key-type {:?}, expected one of i32/i64/u32/u64", other),
        },
        "nfl" => match key_type {
            "i32" => run_nfl::<i32>(workload_path, batch_size, &cfg, show_incremental),
            "i64" => run_nfl::<i64>(workload_path, batch_size, &cfg, show_incremental),
            "u32" => run_nfl::<u32>(workload_path, batch_size, &cfg, show_incremental),
            "u64" => run_nfl::<u64>(workload_path, batch_size, &cfg, show_incremental),
            other => anyhow::bail!("unsupported key-type {:?}, expected one of i32/i64/u32/u64", other),
        },
        other => anyhow::bail!("unsupported index-name {:?}, expected one of afli/nfl", other),
    }
}

/// Keys and values share a type: `afli-eval`'s workload files store
/// `{op, key, value}` as two same-width numeric columns.
fn run_afli<K>(workload_path: &std::path::Path, batch_size: usize, cfg: &Config, show_incremental: bool) -> anyhow::Result<()>
where
    K: workload::BinaryCodec + afli::key::Key,
{
    let file = std::fs::File::open(workload_path)?;
    let mut reader = std::io::BufReader::new(file);
    let records: Vec<workload::Record<K, K>> = workload::read(&mut reader)?;

    let mut index: Afli<K, K> = Afli::new();
    let mut batch_no = 0usize;

    for chunk in records.chunks(batch_size.max(1)) {
        batch_no += 1;
        apply_batch(&mut index, chunk, cfg);
        if show_incremental {
            println!("-- batch {} --\n{}", batch_no, index.to_stats());
        }
    }

    println!("-- final --\n{}", index.to_stats());
    println!("len = {}", index.len());
    println!("model_size = {} bytes", index.model_size());
    println!("index_size = {} bytes", index.index_size());
    Ok(())
}

fn apply_batch<K: afli::key::Key>(index: &mut Afli<K, K>, chunk: &[workload::Record<K, K>], cfg: &Config) {
    let mut bulk_pairs: Vec<(K, K)> = Vec::new();
    for record in chunk {
        match record.op {
            workload::Op::BulkLoad => bulk_pairs.push((record.key, record.value)),
            workload::Op::Query => {
                index.find(record.key);
            }
            workload::Op::Update => {
                index.update(record.key, record.value);
            }
            workload::Op::Insert => index.insert(record.key, record.value),
            workload::Op::Delete => {
                index.remove(record.key);
            }
        }
    }
    if !bulk_pairs.is_empty() {
        if index.is_empty() {
            bulk_pairs.sort_by(|a, b| a.0.cmp(&b.0));
            bulk_pairs.dedup_by(|a, b| a.0 == b.0);
            index.bulk_load(&bulk_pairs, cfg.bucket_size, cfg.aggregate_size);
        } else {
            log::warn!("dropping {} BulkLoad record(s): index is already built", bulk_pairs.len());
        }
    }
}

/// Routes batches through an [`Nfl`] wrapper instead of a plain [`Afli`]
/// (mirrors the `afli`/`nfl` dispatch in `run_afli` above).
fn run_nfl<K>(workload_path: &std::path::Path, batch_size: usize, cfg: &Config, show_incremental: bool) -> anyhow::Result<()>
where
    K: workload::BinaryCodec + afli::key::Key,
{
    let weights_path = cfg
        .nf_weights_path
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("index-name \"nfl\" requires nf_weights_path in the config file"))?;

    let file = std::fs::File::open(workload_path)?;
    let mut reader = std::io::BufReader::new(file);
    let records: Vec<workload::Record<K, K>> = workload::read(&mut reader)?;

    let mut nfl: Nfl<K, K> = Nfl::new(weights_path, cfg.nf_batch_size)?;
    let mut batch_no = 0usize;

    for chunk in records.chunks(batch_size.max(1)) {
        batch_no += 1;
        apply_batch_nfl(&mut nfl, chunk, cfg);
        if show_incremental {
            println!("-- batch {} (flow enabled={}) --\n{}", batch_no, nfl.enabled(), nfl.to_stats());
        }
    }

    println!("-- final (flow enabled={}) --\n{}", nfl.enabled(), nfl.to_stats());
    println!("model_size = {} bytes", nfl.model_size());
    println!("index_size = {} bytes", nfl.index_size());
    Ok(())
}

fn apply_batch_nfl<K: afli::key::Key>(nfl: &mut Nfl<K, K>, chunk: &[workload::Record<K, K>], cfg: &Config) {
    let mut bulk_pairs: Vec<(K, K)> = Vec::new();
    let mut live: Vec<(K, K)> = Vec::new();
    let mut live_ops: Vec<workload::Op> = Vec::new();

    for record in chunk {
        match record.op {
            workload::Op::BulkLoad => bulk_pairs.push((record.key, record.value)),
            op => {
                live_ops.push(op);
                live.push((record.key, record.value));
            }
        }
    }

    if !bulk_pairs.is_empty() {
        if nfl.is_empty() {
            bulk_pairs.sort_by(|a, b| a.0.cmp(&b.0));
            bulk_pairs.dedup_by(|a, b| a.0 == b.0);
            let tail = nfl.auto_switch(&bulk_pairs);
            let bucket_size = cfg.bucket_size.unwrap_or(tail.max(1) as usize);
            nfl.bulk_load(&bulk_pairs, bucket_size, cfg.aggregate_size);
        } else {
            log::warn!("dropping {} BulkLoad record(s): index is already built", bulk_pairs.len());
        }
    }

    if live.is_empty() {
        return;
    }
    nfl.transform(&live);
    for (idx, op) in live_ops.into_iter().enumerate() {
        match op {
            workload::Op::Query => {
                nfl.find(idx);
            }
            workload::Op::Update => {
                nfl.update(idx);
            }
            workload::Op::Insert => nfl.insert(idx),
            workload::Op::Delete => {
                nfl.remove(idx);
            }
            workload::Op::BulkLoad => unreachable!("filtered out above"),
        }
    }
}
