//! Link enumerator. Reads the listing page navigation and returns every branch detail page URL.

use crate::scraper::error::ScraperError;
use crate::scraper::{parse_selector, SiteClient};
use scraper::Html;

/// Fetch the listing page and return the absolute URLs of all submenu links.
pub async fn enumerate_links(
    client: &SiteClient,
    listing_url: &str,
    origin: &str,
) -> Result<Vec<String>, ScraperError> {
    let html = client.get_text(listing_url).await?;
    let links = parse_submenu_links(&html, listing_url, origin)?;
    log::info!("Found {} branch page link(s) on {}", links.len(), listing_url);
    Ok(links)
}

/// Collect the `href` of every anchor inside each `ul.sub-menu`, prefixed with `origin`.
///
/// Document order is kept and duplicates are not removed. A submenu nested inside another
/// contributes its anchors once per enclosing submenu.
fn parse_submenu_links(
    html: &str,
    page_url: &str,
    origin: &str,
) -> Result<Vec<String>, ScraperError> {
    let doc = Html::parse_document(html);
    let menu_sel = parse_selector("ul.sub-menu")?;
    let anchor_sel = parse_selector("a")?;

    let mut links = Vec::new();
    for menu in doc.select(&menu_sel) {
        for anchor in menu.select(&anchor_sel) {
            let href = anchor
                .value()
                .attr("href")
                .ok_or_else(|| ScraperError::missing(page_url, "href on submenu link"))?;
            links.push(format!("{}{}", origin, href));
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://oriencoop.cl";

    #[test]
    fn inline_parse_submenu_links() -> Result<(), ScraperError> {
        let html = r#"<html><body><nav><ul class="menu">
<li><a href="/">Inicio</a></li>
<li><a href="/sucursales.htm">Sucursales</a>
  <ul class="sub-menu">
    <li><a href="/sucursales/talca.htm">Talca</a></li>
    <li><a href="/sucursales/curico.htm">Curicó</a></li>
  </ul>
</li>
<li><a href="/creditos.htm">Créditos</a>
  <ul class="sub-menu"><li><a href="/sucursales/linares.htm">Linares</a></li></ul>
</li>
</ul></nav></body></html>"#;
        let links = parse_submenu_links(html, "https://oriencoop.cl/sucursales.htm", ORIGIN)?;
        assert_eq!(
            links,
            vec![
                "https://oriencoop.cl/sucursales/talca.htm",
                "https://oriencoop.cl/sucursales/curico.htm",
                "https://oriencoop.cl/sucursales/linares.htm",
            ]
        );
        Ok(())
    }

    #[test]
    fn every_link_is_prefixed_with_origin() -> Result<(), ScraperError> {
        let items: String = (0..7)
            .map(|i| format!(r#"<li><a href="/sucursales/{}.htm">{}</a></li>"#, i, i))
            .collect();
        let html = format!(r#"<ul class="sub-menu">{}</ul>"#, items);
        let links = parse_submenu_links(&html, "https://oriencoop.cl/sucursales.htm", ORIGIN)?;
        assert_eq!(links.len(), 7);
        assert!(links.iter().all(|l| l.starts_with(ORIGIN)));
        Ok(())
    }

    #[test]
    fn duplicates_are_kept() -> Result<(), ScraperError> {
        let html = r#"<ul class="sub-menu"><li><a href="/a.htm">A</a></li><li><a href="/a.htm">A</a></li></ul>"#;
        let links = parse_submenu_links(html, "https://oriencoop.cl/", ORIGIN)?;
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], links[1]);
        Ok(())
    }

    #[test]
    fn no_submenu_yields_no_links() -> Result<(), ScraperError> {
        let html = r#"<ul class="menu"><li><a href="/a.htm">A</a></li></ul>"#;
        let links = parse_submenu_links(html, "https://oriencoop.cl/", ORIGIN)?;
        assert!(links.is_empty());
        Ok(())
    }

    #[test]
    fn anchor_without_href_errors() -> Result<(), String> {
        let html = r#"<ul class="sub-menu"><li><a>Sin enlace</a></li></ul>"#;
        match parse_submenu_links(html, "https://oriencoop.cl/", ORIGIN) {
            Err(ScraperError::MissingElement { what, .. }) if what.contains("href") => Ok(()),
            other => Err(format!("expected MissingElement, got {:?}", other)),
        }
    }
}
