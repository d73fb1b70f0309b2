// src/fetch/listing.rs
use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::members::Member;

pub const SEARCH_URL: &str = "https://www.ourcommons.ca/Members/en/search";

static TILE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.ce-mip-mp-tile").expect("tile selector should parse"));
static NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.ce-mip-mp-name").expect("name selector should parse"));
static PARTY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.ce-mip-mp-party").expect("party selector should parse"));
static CONSTITUENCY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.ce-mip-mp-constituency").expect("constituency selector should parse")
});
static PROVINCE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.ce-mip-mp-province").expect("province selector should parse")
});
static IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("img selector should parse"));

// id sits in the trailing parentheses: /Members/en/ziad-aboultaif(89156)
static MEMBER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]+)\)/?$").expect("member id pattern should compile"));

/// GET the directory page and return its body.
#[instrument(level = "info", skip(client))]
pub async fn fetch_listing(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching listing from {}", url);
    let html = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))?;
    info!(bytes = html.len(), "listing fetched");
    Ok(html)
}

/// Parse every member tile on the page, resolving links against `base`.
pub fn parse_members(html: &str, base: &Url) -> Result<Vec<Member>> {
    let doc = Html::parse_document(html);
    let members = doc
        .select(&TILE)
        .enumerate()
        .map(|(i, tile)| parse_tile(tile, base).with_context(|| format!("member tile #{}", i)))
        .collect::<Result<Vec<_>>>()?;
    info!(count = members.len(), "parsed member tiles");
    Ok(members)
}

fn parse_tile(tile: ElementRef<'_>, base: &Url) -> Result<Member> {
    let href = tile
        .value()
        .attr("href")
        .ok_or_else(|| anyhow!("tile has no href"))?;
    let member_url = base
        .join(href)
        .with_context(|| format!("joining member link {}", href))?;
    let id = member_id(member_url.as_str())
        .ok_or_else(|| anyhow!("no member id in {}", member_url))?;

    let src = tile
        .select(&IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| anyhow!("tile has no portrait image"))?;
    let img_url = base
        .join(src)
        .with_context(|| format!("joining portrait link {}", src))?;

    Ok(Member {
        id: id.to_string(),
        fullname: text_of(tile, &NAME, "name")?,
        party: text_of(tile, &PARTY, "party")?,
        constituency: text_of(tile, &CONSTITUENCY, "constituency")?,
        province: text_of(tile, &PROVINCE, "province")?,
        img_url: img_url.to_string(),
        member_url: member_url.to_string(),
    })
}

fn text_of(tile: ElementRef<'_>, sel: &Selector, what: &str) -> Result<String> {
    let el = tile
        .select(sel)
        .next()
        .ok_or_else(|| anyhow!("tile has no {} element", what))?;
    Ok(el.text().collect::<String>().trim().to_string())
}

pub fn member_id(member_url: &str) -> Option<&str> {
    MEMBER_ID
        .captures(member_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
