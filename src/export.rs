//! Downloadable tabular renderings of synthesized artifacts.
//!
//! Column layouts are a published format: ads are one wide row with a column
//! per headline/description slot, campaigns are one row per ad group.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;

use crate::synthesis::limits::{MAX_DESCRIPTIONS, MAX_HEADLINES};
use crate::synthesis::{AdVariant, CampaignStructure};

pub const AD_GROUP_COLUMN: &str = "Ad Group";
pub const KEYWORDS_COLUMN: &str = "Keywords";
pub const KEYWORD_SEPARATOR: &str = "; ";

pub fn ad_headers() -> Vec<String> {
    (1..=MAX_HEADLINES)
        .map(|n| format!("Headline {n}"))
        .chain((1..=MAX_DESCRIPTIONS).map(|n| format!("Description {n}")))
        .collect()
}

pub fn write_ads<W: Write>(variant: &AdVariant, writer: W) -> Result<()> {
    let mut out = Writer::from_writer(writer);
    out.write_record(ad_headers())?;
    let row: Vec<&str> = slots(&variant.headlines, MAX_HEADLINES)
        .chain(slots(&variant.descriptions, MAX_DESCRIPTIONS))
        .collect();
    out.write_record(&row)?;
    out.flush()?;
    Ok(())
}

pub fn write_campaign<W: Write>(campaign: &CampaignStructure, writer: W) -> Result<()> {
    let mut out = Writer::from_writer(writer);
    out.write_record([AD_GROUP_COLUMN, KEYWORDS_COLUMN])?;
    for group in &campaign.ad_groups {
        let keywords = group
            .keywords
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(KEYWORD_SEPARATOR);
        out.write_record([group.name.as_str(), keywords.as_str()])?;
    }
    out.flush()?;
    Ok(())
}

pub fn ads_to_string(variant: &AdVariant) -> Result<String> {
    let mut buffer = Vec::new();
    write_ads(variant, &mut buffer)?;
    String::from_utf8(buffer).context("Ad export produced invalid UTF-8")
}

pub fn campaign_to_string(campaign: &CampaignStructure) -> Result<String> {
    let mut buffer = Vec::new();
    write_campaign(campaign, &mut buffer)?;
    String::from_utf8(buffer).context("Campaign export produced invalid UTF-8")
}

pub fn export_ads(variant: &AdVariant, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_ads(variant, file).with_context(|| format!("Failed to write ads to {:?}", path))
}

pub fn export_campaign(campaign: &CampaignStructure, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_campaign(campaign, file)
        .with_context(|| format!("Failed to write campaign to {:?}", path))
}

/// Where a campaign's ads are written next to it: `campaign.csv` -> `campaign_ads.csv`.
pub fn ads_companion_path(campaign_path: &Path) -> PathBuf {
    let stem = campaign_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "campaign".into());
    let extension = campaign_path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".into());
    campaign_path.with_file_name(format!("{stem}_ads.{extension}"))
}

fn slots(items: &[String], width: usize) -> impl Iterator<Item = &str> {
    items
        .iter()
        .map(String::as_str)
        .chain(std::iter::repeat(""))
        .take(width)
}
