//! List command - Print the mixins published in the catalog.

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use mix_registry::{CatalogClient, CatalogEntry, DEFAULT_CATALOG_URL};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Mixin catalog location
    #[arg(long, env = "MIXTOOL_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,
}

pub async fn execute(args: ListArgs) -> Result<()> {
    let catalog = CatalogClient::new(&args.catalog_url)
        .fetch()
        .await
        .context("Failed to list mixins")?;

    for entry in catalog.entries() {
        println!("{}", format_entry(entry));
    }
    info!("{} mixin(s) available", catalog.entries().len());
    Ok(())
}

fn format_entry(entry: &CatalogEntry) -> String {
    let location = entry.source_url().unwrap_or_else(|e| {
        warn!("Catalog entry {} has an invalid URL: {}", entry.name, e);
        format!("{}/{}", entry.url, entry.subdir)
    });
    format!("{}\t{}", entry.name, location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, url: &str, subdir: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            url: url.to_string(),
            subdir: subdir.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry(&entry("foo", "https://example.com/repo", "mixin")),
            "foo\thttps://example.com/repo/mixin"
        );
    }

    #[test]
    fn test_format_entry_invalid_url() {
        assert_eq!(format_entry(&entry("odd", "repo", "mixin")), "odd\trepo/mixin");
    }
}
