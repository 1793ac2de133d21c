//! lodnorm CLI: normalize linked data authority responses.
//!
//! Commands: search, find, authorities, completions

use std::collections::BTreeMap;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use lodnorm_core::{AuthorityRegistry, EngineSettings, Graph, UrlTemplate};
use lodnorm_engine::{
    format_search_results, format_term, Engine, FindParams, OutputFormat, SearchParams,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lodnorm")]
#[command(version)]
#[command(about = "Normalize linked data authority responses into ranked results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of authority configuration files (*.yml, *.yaml)
    #[arg(long, global = true, default_value = "authorities")]
    authorities: PathBuf,

    /// Engine settings file (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Engine-wide default language; overrides the settings file
    #[arg(long = "default-language", global = true)]
    default_language: Vec<String>,

    /// Output format
    #[arg(long, global = true, default_value = "json", value_enum)]
    format: FormatArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Json,
    Table,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the results of a search response graph
    #[command(alias = "s")]
    Search {
        /// Authority name
        authority: String,
        /// Search query, used to build the request URL
        query: String,
        /// N-Triples response graph ("-" reads stdin)
        #[arg(long)]
        graph: PathBuf,
        /// Language, highest precedence
        #[arg(long)]
        lang: Option<String>,
        /// Sub-authority name
        #[arg(long)]
        subauth: Option<String>,
        /// Extra URL template values as name=value
        #[arg(long = "replace", value_parser = parse_key_value)]
        replacements: Vec<(String, String)>,
        /// Sort predicate, replacing the configured one
        #[arg(long)]
        sort: Option<String>,
        /// Context field as name=predicate; replaces the configured context
        #[arg(long = "context", value_parser = parse_key_value)]
        context: Vec<(String, String)>,
    },
    /// Build the detailed record for one term
    #[command(alias = "f")]
    Find {
        /// Authority name
        authority: String,
        /// Term id or absolute IRI
        id: String,
        /// N-Triples response graph ("-" reads stdin)
        #[arg(long)]
        graph: PathBuf,
        /// Language, highest precedence
        #[arg(long)]
        lang: Option<String>,
        /// Sub-authority name
        #[arg(long)]
        subauth: Option<String>,
        /// Extra URL template values as name=value
        #[arg(long = "replace", value_parser = parse_key_value)]
        replacements: Vec<(String, String)>,
    },
    /// List configured authorities
    Authorities,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: clap_complete::Shell,
    },
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lodnorm=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format);

    match cli.command {
        Commands::Search {
            authority,
            query,
            graph,
            lang,
            subauth,
            replacements,
            sort,
            context,
        } => {
            let registry = load_registry(&cli.authorities)?;
            let engine = Engine::new(load_settings(cli.settings.as_deref(), cli.default_language)?);
            let config = registry.get(&authority)?;
            let section = config.search_section()?;

            let replacements = collect_replacements(&section.url, replacements);
            let url = section.url_for(
                &config.name,
                &query,
                subauth.as_deref(),
                lang.as_deref(),
                &replacements,
            )?;
            info!(%url, "search url");

            let graph = read_graph(&graph)?;
            let params = SearchParams {
                language: lang,
                subauthority: subauth,
                sort,
                context: (!context.is_empty()).then(|| context.into_iter().collect()),
            };
            let results = engine.search(config, &graph, &params)?;
            println!("{}", format_search_results(&results, format));
        }
        Commands::Find {
            authority,
            id,
            graph,
            lang,
            subauth,
            replacements,
        } => {
            let registry = load_registry(&cli.authorities)?;
            let engine = Engine::new(load_settings(cli.settings.as_deref(), cli.default_language)?);
            let config = registry.get(&authority)?;
            let section = config.term_section()?;

            let replacements = collect_replacements(&section.url, replacements);
            let url = section.url_for(
                &config.name,
                &id,
                subauth.as_deref(),
                lang.as_deref(),
                &replacements,
            )?;
            info!(%url, "term url");

            let graph = read_graph(&graph)?;
            let params = FindParams {
                language: lang,
                subauthority: subauth,
                request_url: Some(url),
            };
            let term = engine.find(config, &graph, &id, &params)?;
            println!("{}", format_term(&term, format));
        }
        Commands::Authorities => {
            let registry = load_registry(&cli.authorities)?;
            let names: Vec<serde_json::Value> = registry
                .authorities()
                .map(|a| {
                    serde_json::json!({
                        "name": a.name,
                        "search": a.search.is_some(),
                        "term": a.term.is_some(),
                        "subauthorities": a
                            .search
                            .as_ref()
                            .map(|s| s.subauthorities.keys().cloned().collect::<Vec<_>>())
                            .unwrap_or_default(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "lodnorm", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn collect_replacements(
    template: &UrlTemplate,
    pairs: Vec<(String, String)>,
) -> BTreeMap<String, String> {
    for (name, _) in &pairs {
        if !template.declares(name) {
            warn!(variable = %name, "replacement is not declared by the url template");
        }
    }
    pairs.into_iter().collect()
}

fn load_registry(dir: &Path) -> Result<AuthorityRegistry> {
    if !dir.is_dir() {
        bail!("authority directory {} does not exist", dir.display());
    }
    let registry = AuthorityRegistry::load_dir(dir)
        .with_context(|| format!("loading authorities from {}", dir.display()))?;
    debug!(count = registry.len(), dir = %dir.display(), "authorities loaded");
    Ok(registry)
}

fn load_settings(path: Option<&Path>, default_language: Vec<String>) -> Result<EngineSettings> {
    let mut settings = match path {
        Some(path) => EngineSettings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => EngineSettings::default(),
    };
    if !default_language.is_empty() {
        settings.default_language = default_language;
    }
    Ok(settings)
}

fn read_graph(path: &Path) -> Result<Graph> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading graph from {}", path.display()))?
    };
    let graph = lodnorm_parser::parse_ntriples(&content)
        .with_context(|| format!("parsing graph from {}", path.display()))?;
    debug!(triples = graph.len(), "graph parsed");
    Ok(graph)
}
