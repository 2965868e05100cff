//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::query::{Format, Order, OrderBy, OrderKey, QueryOptions};

/// Folio content index CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// Query as a production build: drafts are left out
    #[arg(long)]
    pub production: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Sort field accepted by `--order-by`
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OrderKeyArg {
    PublishedOn,
    UpdatedOn,
    Title,
}

/// Sort direction accepted by `--order`
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OrderArg {
    Asc,
    #[default]
    Desc,
}

/// Filters, ordering and pagination for `query`
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Keep entries of this locale (and locale-free entries)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Keep only these entry ids
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Keep entries written by one of these authors
    #[arg(long = "author")]
    pub authors: Vec<String>,

    /// Keep entries in one of these blog categories
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Keep entries carrying one of these tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Sort by this field
    #[arg(long, value_enum)]
    pub order_by: Option<OrderKeyArg>,

    /// Sort direction
    #[arg(long, value_enum, default_value_t)]
    pub order: OrderArg,

    /// Page size
    #[arg(long)]
    pub first: Option<usize>,

    /// Number of entries to skip
    #[arg(long, default_value_t = 0)]
    pub after: usize,

    /// Include seo, authors and body in the output
    #[arg(long)]
    pub full: bool,
}

impl QueryArgs {
    pub fn to_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new()
            .ids(self.ids.iter().cloned())
            .authors(self.authors.iter().cloned())
            .categories(self.categories.iter().cloned())
            .tags(self.tags.iter().cloned())
            .after(self.after)
            .format(if self.full { Format::Full } else { Format::Preview });
        if let Some(locale) = &self.locale {
            options = options.locale(locale.clone());
        }
        if let Some(first) = self.first {
            options = options.first(first);
        }
        if let Some(key) = self.order_by {
            let key = match key {
                OrderKeyArg::PublishedOn => OrderKey::PublishedOn,
                OrderKeyArg::UpdatedOn => OrderKey::UpdatedOn,
                OrderKeyArg::Title => OrderKey::Title,
            };
            let order = match self.order {
                OrderArg::Asc => Order::Asc,
                OrderArg::Desc => Order::Desc,
            };
            options = options.order_by(OrderBy { key, order });
        }
        options
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the entry index and report collisions or invalid content
    Check,

    /// Print every route with its entry id and title
    Routes,

    /// Print the breadcrumb of a route
    Breadcrumb {
        /// Route to resolve, e.g. `/fr/blog/article`
        route: String,

        /// Label of a trailing pagination crumb, e.g. "Page 2"
        #[arg(long)]
        page: Option<String>,
    },

    /// Query one or more collections and print the result as JSON
    Query {
        /// Collection keys, e.g. `blog.posts guides`
        #[arg(required = true)]
        collections: Vec<String>,

        #[command(flatten)]
        args: QueryArgs,
    },

    /// Print a single entry as JSON
    Entry {
        /// Collection key
        collection: String,

        /// Entry id, e.g. `en/blog.posts/hello`
        id: String,

        /// Swap tags to their equivalent in this locale
        #[arg(short, long)]
        locale: Option<String>,

        /// Include seo, authors and body in the output
        #[arg(long)]
        full: bool,
    },

    /// Print a listing page with its related entries as JSON
    Listing {
        /// Collection key of the listing page
        collection: String,

        /// Entry id of the listing page
        id: String,

        /// Page size
        #[arg(long)]
        first: Option<usize>,

        /// Number of related entries to skip
        #[arg(long, default_value_t = 0)]
        after: usize,
    },

    /// Print the table of contents of an entry body
    Toc {
        /// Collection key
        collection: String,

        /// Entry id
        id: String,
    },

    /// Write sitemap.xml from the route index
    Sitemap,
}
