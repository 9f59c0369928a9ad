mod output;

use anyhow::Context;
use clap::Parser;
use folio_core::{source_for, Catalog, CategoryFilter, Config, Exporter, FilterCriteria};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Filter, search and page through a portfolio project catalog", long_about = None)]
struct Cli {
    /// Catalog JSON file or http(s) URL (overrides the config file)
    #[arg(long, global = true, env = "FOLIO_CATALOG")]
    catalog: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Filter and page through projects
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        /// Projects per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Show an empty page instead of the last one when --page is too high
        #[arg(long)]
        no_clamp: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show one project and what's related to it
    Show {
        /// Project slug
        slug: String,
    },
    /// List projects sharing tags with a project
    Related {
        /// Project slug
        slug: String,

        /// How many to list
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Project count per category, with the tag keywords behind each
    Categories,
    /// Tag usage across the catalog
    Tags,
    /// Distinct clients
    Clients,
    /// Write every matching project to a .json, .csv or .md file
    Export {
        /// Output file; format comes from the extension
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show the config file in use, or update it
    Config {
        /// Remember this catalog file or URL
        #[arg(long)]
        set_catalog: Option<String>,
    },
}

/// Filter flags shared by `search` and `export`
#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// URL query string to start from, e.g. "tags=web,ux&page=2"
    #[arg(long)]
    query: Option<String>,

    /// Free-text search over title, client, objective and tags
    #[arg(short, long)]
    search: Option<String>,

    /// Category slug, or "all"
    #[arg(short, long)]
    category: Option<String>,

    /// Tag to match (repeat or comma-separate; any one matching is enough)
    #[arg(short, long = "tag", value_delimiter = ',')]
    tags: Vec<String>,

    /// Client name to match (repeat or comma-separate)
    #[arg(long = "client", value_delimiter = ',')]
    clients: Vec<String>,

    /// 1-based page number
    #[arg(short, long)]
    page: Option<usize>,
}

impl FilterArgs {
    /// Query string first, explicit flags on top.
    ///
    /// Changing the filters invalidates the query string's page unless
    /// `--page` is given too.
    fn to_criteria(&self) -> FilterCriteria {
        let mut criteria = self
            .query
            .as_deref()
            .map(FilterCriteria::from_query_string)
            .unwrap_or_default();

        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.trim());
        }
        if let Some(category) = &self.category {
            criteria = criteria.with_category(CategoryFilter::parse(category));
        }
        if !self.tags.is_empty() {
            criteria = criteria.with_tags(self.tags.iter().cloned());
        }
        if !self.clients.is_empty() {
            criteria = criteria.with_clients(self.clients.iter().cloned());
        }
        if let Some(page) = self.page {
            criteria = criteria.with_page(page);
        } else if self.changes_filters() {
            criteria = criteria.reset_page();
        }

        criteria
    }

    fn changes_filters(&self) -> bool {
        self.search.is_some()
            || self.category.is_some()
            || !self.tags.is_empty()
            || !self.clients.is_empty()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON/CSV on stdout stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,folio_core=info,folio_source=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    match cli.command {
        Commands::Search {
            filters,
            page_size,
            no_clamp,
            format,
        } => {
            let catalog = open_catalog(cli.catalog, &config).await?;
            let criteria = filters.to_criteria();
            tracing::info!("Searching with: {}", criteria);

            let mut options = config.query_options();
            if let Some(size) = page_size {
                options.page_size = size.max(1);
            }
            if no_clamp {
                options.clamp_page = false;
            }

            let result = catalog.query(&criteria, &options);
            output::print_result(&result, format)?;
        }
        Commands::Show { slug } => {
            let catalog = open_catalog(cli.catalog, &config).await?;
            let record = catalog.require(&slug)?;
            let related = catalog.related(&slug, config.related.limit)?;
            output::print_record(record, &related);
        }
        Commands::Related { slug, limit } => {
            let catalog = open_catalog(cli.catalog, &config).await?;
            let limit = limit.unwrap_or(config.related.limit);
            let related = catalog.related(&slug, limit)?;
            output::print_related(&slug, &related);
        }
        Commands::Categories => {
            let catalog = open_catalog(cli.catalog, &config).await?;
            output::print_categories(&catalog.category_counts());
        }
        Commands::Tags => {
            let catalog = open_catalog(cli.catalog, &config).await?;
            output::print_counts("Tag", &catalog.tag_counts());
        }
        Commands::Clients => {
            let catalog = open_catalog(cli.catalog, &config).await?;
            for client in catalog.clients() {
                println!("{}", client);
            }
        }
        Commands::Export { path, filters } => {
            let catalog = open_catalog(cli.catalog, &config).await?;
            let criteria = filters.to_criteria();
            let matched = catalog.filter(&criteria);

            Exporter::export_to_file(&matched, &path)
                .with_context(|| format!("Failed to export to {}", path.display()))?;
            tracing::info!("Exported {} projects to {}", matched.len(), path.display());
        }
        Commands::Config { set_catalog } => {
            configure(cli.config.as_deref(), config, set_catalog)?;
        }
    }

    Ok(())
}

/// `--catalog` wins over the config file
async fn open_catalog(flag: Option<String>, config: &Config) -> anyhow::Result<Catalog> {
    let location = flag
        .or_else(|| config.catalog.location.clone())
        .context("No catalog given. Pass --catalog <file|url> or set catalog.location in the config")?;

    let source = source_for(&location, &config.fetch)?;
    Catalog::load(source.as_ref())
        .await
        .with_context(|| format!("Failed to load catalog from {}", location))
}

fn configure(path: Option<&Path>, mut config: Config, set_catalog: Option<String>) -> anyhow::Result<()> {
    let shown = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };

    if let Some(location) = set_catalog {
        config.catalog.location = Some(location.trim().to_string());
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        tracing::info!("Saved config to {}", shown.display());
    }

    println!("Config file: {}", shown.display());
    println!(
        "catalog.location     = {}",
        config.catalog.location.as_deref().unwrap_or("(unset)")
    );
    println!("pagination.page_size = {}", config.pagination.page_size);
    println!("pagination.clamp     = {}", config.pagination.clamp_page);
    println!("related.limit        = {}", config.related.limit);
    println!("fetch.timeout_secs   = {}", config.fetch.timeout_secs);
    println!("fetch.max_retries    = {}", config.fetch.max_retries);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("folio").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_build_criteria() {
        let cli = parse(&[
            "search", "--tag", "web,ux", "--tag", "print", "--client", "Acme", "-s", "coffee", "-p", "2",
        ]);

        let Commands::Search { filters, .. } = cli.command else {
            panic!("expected search");
        };
        let criteria = filters.to_criteria();

        assert_eq!(criteria.tags, vec!["web", "ux", "print"]);
        assert_eq!(criteria.clients, vec!["Acme"]);
        assert_eq!(criteria.search, "coffee");
        assert_eq!(criteria.page, 2);
    }

    #[test]
    fn test_flags_override_query_string() {
        let cli = parse(&[
            "export",
            "out.csv",
            "--query",
            "category=print&tags=poster&page=3",
            "--category",
            "all",
        ]);

        let Commands::Export { filters, .. } = cli.command else {
            panic!("expected export");
        };
        let criteria = filters.to_criteria();

        assert!(criteria.category.is_all());
        assert_eq!(criteria.tags, vec!["poster"]);
        assert_eq!(criteria.page, 1);
    }

    #[test]
    fn test_query_string_page_survives_without_filter_flags() {
        let cli = parse(&["search", "--query", "tags=poster&page=3"]);
        let Commands::Search { filters, .. } = cli.command else {
            panic!("expected search");
        };
        assert_eq!(filters.to_criteria().page, 3);

        let cli = parse(&["search", "--query", "page=3", "--tag", "web", "--page", "2"]);
        let Commands::Search { filters, .. } = cli.command else {
            panic!("expected search");
        };
        assert_eq!(filters.to_criteria().page, 2);
    }

    #[test]
    fn test_config_set_catalog_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        configure(Some(&path), Config::default(), Some(" projects.json ".into())).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.catalog.location.as_deref(), Some("projects.json"));
    }

    #[test]
    fn test_global_catalog_flag() {
        let cli = parse(&["categories", "--catalog", "data/projects.json"]);
        assert_eq!(cli.catalog.as_deref(), Some("data/projects.json"));
    }
}
