//! Branch data extractor. Fetches detail pages concurrently and turns each `div.sucursal`
//! block into a [BranchRecord].
//!
//! The second and third phones come from the page-level `.b-call` contact block, so every
//! record from the same page carries the same two values.

use crate::hours::parse_working_hours;
use crate::model::{BranchRecord, BRAND_NAME};
use crate::scraper::error::ScraperError;
use crate::scraper::{parse_selector, ScrapeOptions, SiteClient};
use futures::stream::{self, StreamExt};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const BLOCK: &str = "div.sucursal";
const ADDRESS_CONTAINER: &str = "div.s-dato";
const ADDRESS: &str = "span";
const MAP_CONTAINER: &str = "div.s-mapa";
const MAP_IFRAME: &str = "iframe";
const BRANCH_PHONE: &str = ".s-dato > p:nth-child(3) > span:nth-child(3)";
const CONTACT_PHONE: &str = ".b-call > a:nth-child(3)";
const CONTACT_PHONE_ALT: &str = ".b-call > a:nth-child(6)";
const MORNING_HOURS: &str = ".s-dato > p:nth-child(5) > span:nth-child(3)";
const AFTERNOON_HOURS: &str = ".s-dato > p:nth-child(5) > span:nth-child(5)";

/// Map embeds encode the two coordinates as `!2d<value>!` and `!3d<value>!`.
const FIRST_COORD_PATTERN: &str = r"2d([^<>]+)!";
const SECOND_COORD_PATTERN: &str = r"3d([^<>]+)!";

/// Compiled selectors and coordinate patterns, built once per run and shared by all pages.
pub(crate) struct BranchSelectors {
    block: Selector,
    address_container: Selector,
    address: Selector,
    map_container: Selector,
    map_iframe: Selector,
    branch_phone: Selector,
    contact_phone: Selector,
    contact_phone_alt: Selector,
    morning: Selector,
    afternoon: Selector,
    first_coord: Regex,
    second_coord: Regex,
}

impl BranchSelectors {
    pub(crate) fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            block: parse_selector(BLOCK)?,
            address_container: parse_selector(ADDRESS_CONTAINER)?,
            address: parse_selector(ADDRESS)?,
            map_container: parse_selector(MAP_CONTAINER)?,
            map_iframe: parse_selector(MAP_IFRAME)?,
            branch_phone: parse_selector(BRANCH_PHONE)?,
            contact_phone: parse_selector(CONTACT_PHONE)?,
            contact_phone_alt: parse_selector(CONTACT_PHONE_ALT)?,
            morning: parse_selector(MORNING_HOURS)?,
            afternoon: parse_selector(AFTERNOON_HOURS)?,
            first_coord: compile_pattern(FIRST_COORD_PATTERN)?,
            second_coord: compile_pattern(SECOND_COORD_PATTERN)?,
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ScraperError> {
    Regex::new(pattern).map_err(|e| ScraperError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Fetch every detail page, at most `options.concurrency` at a time, and extract all branches.
///
/// Waits for every page to settle before returning. Records come back in link order, then
/// block order within a page, regardless of which response arrived first. If any page
/// failed, the failure with the lowest link index is returned and no records are.
pub async fn extract_branches(
    client: &SiteClient,
    links: &[String],
    options: &ScrapeOptions<'_>,
) -> Result<Vec<BranchRecord>, ScraperError> {
    let selectors = BranchSelectors::new()?;
    let selectors = &selectors;
    let total = links.len();
    let mut done = 0usize;

    let mut settled: Vec<(usize, Result<Vec<BranchRecord>, ScraperError>)> =
        stream::iter(links.iter().enumerate())
            .map(move |(index, url)| async move {
                (index, fetch_branch_page(client, selectors, url).await)
            })
            .buffer_unordered(options.concurrency.max(1))
            .inspect(|_| {
                done += 1;
                if let Some(p) = options.progress {
                    p(done, total);
                }
            })
            .collect()
            .await;

    settled.sort_by_key(|(index, _)| *index);
    let mut records = Vec::new();
    for (_, page) in settled {
        records.extend(page?);
    }
    log::info!(
        "Extracted {} branch record(s) from {} page(s)",
        records.len(),
        total
    );
    Ok(records)
}

async fn fetch_branch_page(
    client: &SiteClient,
    selectors: &BranchSelectors,
    url: &str,
) -> Result<Vec<BranchRecord>, ScraperError> {
    let html = client.get_text(url).await?;
    let records = parse_branch_page(&html, url, selectors)?;
    log::debug!("{}: {} branch block(s)", url, records.len());
    Ok(records)
}

/// Parse every `div.sucursal` block on a detail page. A page with no blocks yields no records.
pub(crate) fn parse_branch_page(
    html: &str,
    url: &str,
    selectors: &BranchSelectors,
) -> Result<Vec<BranchRecord>, ScraperError> {
    let doc = Html::parse_document(html);
    let blocks: Vec<ElementRef<'_>> = doc.select(&selectors.block).collect();
    if blocks.is_empty() {
        return Ok(Vec::new());
    }

    let root = doc.root_element();
    let contact_phone = first_text(root, &selectors.contact_phone, url, CONTACT_PHONE)?;
    let contact_phone_alt =
        first_text(root, &selectors.contact_phone_alt, url, CONTACT_PHONE_ALT)?.replace(' ', "");

    blocks
        .into_iter()
        .map(|block| parse_block(block, url, selectors, &contact_phone, &contact_phone_alt))
        .collect()
}

fn parse_block(
    block: ElementRef<'_>,
    url: &str,
    selectors: &BranchSelectors,
    contact_phone: &str,
    contact_phone_alt: &str,
) -> Result<BranchRecord, ScraperError> {
    let container = block
        .select(&selectors.address_container)
        .next()
        .ok_or_else(|| ScraperError::missing(url, ADDRESS_CONTAINER))?;
    let address = first_text(container, &selectors.address, url, "address span")?;

    let src = block
        .select(&selectors.map_container)
        .next()
        .and_then(|map| map.select(&selectors.map_iframe).next())
        .ok_or_else(|| ScraperError::missing(url, "map embed iframe"))?
        .value()
        .attr("src")
        .ok_or_else(|| ScraperError::missing(url, "src on map embed iframe"))?;
    let latlon = extract_coordinates(src, url, selectors)?;

    let branch_phone =
        first_text(block, &selectors.branch_phone, url, BRANCH_PHONE)?.replace('-', "");
    let morning = first_text(block, &selectors.morning, url, MORNING_HOURS)?;
    let afternoon = first_text(block, &selectors.afternoon, url, AFTERNOON_HOURS)?;

    Ok(BranchRecord {
        address,
        latlon,
        name: BRAND_NAME.to_string(),
        phones: [
            branch_phone,
            contact_phone.to_string(),
            contact_phone_alt.to_string(),
        ],
        working_hours: parse_working_hours(&morning, &afternoon),
    })
}

/// Full text of the first element under `scope` matching `sel`.
fn first_text(
    scope: ElementRef<'_>,
    sel: &Selector,
    url: &str,
    what: &str,
) -> Result<String, ScraperError> {
    scope
        .select(sel)
        .next()
        .map(|e| e.text().collect::<String>())
        .ok_or_else(|| ScraperError::missing(url, what))
}

/// Read the `2d` and `3d` values out of a map embed URL, in that order.
fn extract_coordinates(
    src: &str,
    url: &str,
    selectors: &BranchSelectors,
) -> Result<[f64; 2], ScraperError> {
    let first = coordinate_after(&selectors.first_coord, src, url, "2d")?;
    let second = coordinate_after(&selectors.second_coord, src, url, "3d")?;
    Ok([first, second])
}

/// Value following the first marker match, cut at the next `!`.
fn coordinate_after(
    pattern: &Regex,
    src: &str,
    url: &str,
    marker: &str,
) -> Result<f64, ScraperError> {
    let raw = pattern
        .captures(src)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().split('!').next())
        .ok_or_else(|| {
            ScraperError::coordinates(url, format!("no '{}' marker in {:?}", marker, src))
        })?;
    raw.trim().parse::<f64>().map_err(|e| {
        ScraperError::coordinates(
            url,
            format!("'{}' value {:?} is not a number: {}", marker, raw, e),
        )
    })
}
