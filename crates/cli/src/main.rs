use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use settings_index::{FileKey, SettingsCache, SettingsIndexConfig};
use settings_snapshot::{
    snapshot_path_for_project_root, ContributionMarshaller, JsonMarshaller, SnapshotStore,
};
use std::env;
use std::path::PathBuf;

const SNAPSHOT_ENV: &str = "SETTINGS_INDEX_SNAPSHOT";

#[derive(Parser)]
#[command(name = "settings-index")]
#[command(about = "Incremental index of project scenes, tags, layers and inputs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Project root used to locate the default snapshot
    #[arg(long, global = true, default_value = ".")]
    project_root: PathBuf,

    /// Snapshot file (overrides SETTINGS_INDEX_SNAPSHOT)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a JSON contribution for a file key and persist the snapshot
    Merge(MergeArgs),

    /// Drop everything a file key contributed and persist the snapshot
    Drop(DropArgs),

    /// Answer a query against the persisted index
    Query(QueryArgs),

    /// Show snapshot and aggregate sizes
    Stats,
}

#[derive(Args)]
struct MergeArgs {
    /// Opaque file key, usually the project-relative path
    key: String,

    /// JSON file holding the contribution
    contribution: PathBuf,
}

#[derive(Args)]
struct DropArgs {
    key: String,
}

#[derive(Args)]
struct QueryArgs {
    #[arg(value_enum)]
    what: QueryKind,

    /// Scene, tag, layer or input name for lookups
    name: Option<String>,

    /// Also list disabled scenes (build-scenes)
    #[arg(long)]
    include_disabled: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QueryKind {
    SceneExists,
    BuildSettings,
    Disabled,
    Scenes,
    BuildScenes,
    Tags,
    Layers,
    Inputs,
    HasTag,
    HasLayer,
    HasInput,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let snapshot_path = resolve_snapshot_path(&cli);
    log::debug!("Using settings snapshot {}", snapshot_path.display());

    let snapshot = SnapshotStore::load_or_default(&snapshot_path)
        .await
        .with_context(|| format!("Failed to load snapshot {}", snapshot_path.display()))?;
    let mut cache = SettingsCache::new(SettingsIndexConfig::from_env());
    cache.merge_loaded(snapshot.into_contributions());

    let output = match cli.command {
        Commands::Merge(args) => {
            let output = run_merge(&mut cache, args).await?;
            save(&cache, &snapshot_path).await?;
            output
        }
        Commands::Drop(args) => {
            let key = FileKey::new(args.key);
            let outcome = cache.drop_file(&key);
            save(&cache, &snapshot_path).await?;
            json!({
                "status": "ok",
                "key": key,
                "outcome": outcome,
                "files": cache.store().len(),
            })
        }
        Commands::Query(args) => run_query(&cache, &args)?,
        Commands::Stats => run_stats(&cache),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn resolve_snapshot_path(cli: &Cli) -> PathBuf {
    cli.snapshot
        .clone()
        .or_else(|| {
            env::var(SNAPSHOT_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| snapshot_path_for_project_root(&cli.project_root))
}

async fn save(cache: &SettingsCache, path: &std::path::Path) -> Result<()> {
    SnapshotStore::from_store(cache.store())
        .save(path)
        .await
        .with_context(|| format!("Failed to save snapshot {}", path.display()))
}

async fn run_merge(cache: &mut SettingsCache, args: MergeArgs) -> Result<Value> {
    let bytes = tokio::fs::read(&args.contribution)
        .await
        .with_context(|| format!("Failed to read {}", args.contribution.display()))?;
    let contribution = JsonMarshaller::default()
        .unmarshal(&bytes)
        .with_context(|| format!("Invalid contribution in {}", args.contribution.display()))?;

    let key = FileKey::new(args.key);
    let outcome = cache.merge(&key, Some(contribution));
    Ok(json!({
        "status": "ok",
        "key": key,
        "outcome": outcome,
        "files": cache.store().len(),
    }))
}

fn run_query(cache: &SettingsCache, args: &QueryArgs) -> Result<Value> {
    let index = cache.index();

    let result = match args.what {
        QueryKind::SceneExists => json!(index.is_scene_exists(required_name(args)?)),
        QueryKind::BuildSettings => {
            json!(index.is_scene_presented_at_build_settings(required_name(args)?))
        }
        QueryKind::Disabled => {
            json!(index.is_scene_disabled_at_build_settings(required_name(args)?))
        }
        QueryKind::Scenes => json!(index.all_possible_scene_names()),
        QueryKind::BuildScenes => {
            // Enabled scenes first, each group sorted on its own.
            let enabled = index.scene_count_in_build_settings();
            let mut scenes = sorted(index.scenes_from_build_settings(false));
            if args.include_disabled {
                scenes.extend(sorted(index.scenes_from_build_settings(true).skip(enabled)));
            }
            json!(scenes)
        }
        QueryKind::Tags => json!(sorted(index.all_tags())),
        QueryKind::Layers => json!(sorted(index.all_layers())),
        QueryKind::Inputs => json!(sorted(index.all_inputs())),
        QueryKind::HasTag => json!(index.has_tag(required_name(args)?)),
        QueryKind::HasLayer => json!(index.has_layer(required_name(args)?)),
        QueryKind::HasInput => json!(index.has_input(required_name(args)?)),
    };

    Ok(json!({
        "status": "ok",
        "query": args.what.to_possible_value().map(|v| v.get_name().to_string()),
        "name": args.name,
        "result": result,
    }))
}

fn required_name(args: &QueryArgs) -> Result<&str> {
    match args.name.as_deref() {
        Some(name) => Ok(name),
        None => bail!("query {:?} requires a name", args.what),
    }
}

fn run_stats(cache: &SettingsCache) -> Value {
    let index = cache.index();
    json!({
        "status": "ok",
        "files": cache.store().len(),
        "scenes": index.scene_count(),
        "build_settings_scenes": index.scene_count_in_build_settings(),
        "tags": index.tag_count(),
        "layers": index.layer_count(),
        "inputs": index.input_count(),
        "handlers": index_handlers(cache),
    })
}

fn index_handlers(cache: &SettingsCache) -> Vec<&'static str> {
    cache.builder().handler_names().collect()
}

fn sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut values: Vec<_> = values.collect();
    values.sort_unstable();
    values
}
