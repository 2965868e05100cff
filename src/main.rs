//! Folio - query the content index of a multi-locale static site.

use anyhow::{Result, bail};
use clap::Parser;
use serde::Serialize;

use folio::{
    ContentError, Site,
    cli::{Cli, Commands},
    config::SiteConfig,
    content::{CollectionKey, FsStore},
    generator::sitemap::build_sitemap,
    log,
    pageable::{RelatedOptions, is_pageable_entry},
    query::Format,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;
    let store = FsStore::new(&config.build.content, config.i18n.locales.clone());
    let site = Site::new(store, config);

    run(&site, &cli.command).await.inspect_err(|err| {
        log!("error"; "{err:#}");
    })
}

async fn run(site: &Site<FsStore>, command: &Commands) -> Result<()> {
    match command {
        Commands::Check => check(site).await,
        Commands::Routes => print_json(&*site.route_index().await?),
        Commands::Breadcrumb { route, page } => {
            print_json(&site.breadcrumb(route, page.as_deref()).await?)
        }
        Commands::Query { collections, args } => {
            let keys = collections
                .iter()
                .map(|name| name.parse())
                .collect::<Result<Vec<CollectionKey>, _>>()?;
            let result = site.query_collections(&keys, &args.to_options()).await?;
            log!("query"; "{} of {} entries", result.entries.len(), result.total);
            print_json(&result)
        }
        Commands::Entry {
            collection,
            id,
            locale,
            full,
        } => {
            let format = if *full { Format::Full } else { Format::Preview };
            let entry = site
                .query_entry(collection.parse()?, id, locale.as_deref(), format)
                .await?;
            print_json(&entry)
        }
        Commands::Listing {
            collection,
            id,
            first,
            after,
        } => {
            let entry = site.entry(collection.parse()?, id).await?;
            if !is_pageable_entry(&entry) {
                bail!(ContentError::NotPageable {
                    collection: entry.collection(),
                    id: entry.id.clone(),
                });
            }
            let options = RelatedOptions {
                format: Format::Preview,
                first: *first,
                after: *after,
            };
            print_json(&site.add_related_items_to_page(&entry, options).await?)
        }
        Commands::Toc { collection, id } => {
            let entry = site
                .query_entry(collection.parse()?, id, None, Format::Full)
                .await?;
            let toc = entry.content.map(|content| content.toc()).unwrap_or_default();
            print_json(&toc)
        }
        Commands::Sitemap => {
            let index = site.entries_index().await?;
            let routes = site.route_index().await?;
            build_sitemap(site.config(), &routes, &index)?;
            Ok(())
        }
    }
}

/// Build both indexes and report references that point nowhere.
async fn check(site: &Site<FsStore>) -> Result<()> {
    let index = site.entries_index().await?;
    let routes = site.route_index().await?;

    let mut dangling = 0;
    for indexed in index.entries() {
        for reference in indexed.entry.data.references() {
            if index.resolve_reference(&reference).is_none() {
                dangling += 1;
                log!("warn"; "`{}` references missing {} `{}`",
                    indexed.entry.id, reference.collection, reference.id);
            }
        }
    }

    log!("check"; "{} entries, {} routes, {} dangling references",
        index.len(), routes.len(), dangling);
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
