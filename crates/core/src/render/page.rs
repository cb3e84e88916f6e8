use crate::{
    catalog::{CatalogSection, GroupedCatalog},
    models::ShopEntry,
};

use super::{html_escape, PosterChain};

const LOAD_FAILURE: &str = "Failed to load shop. Try again in a bit.";
const FALLBACK_ALT: &str = "Item";

/// Full storefront page: category chips, one grid per section, shared modal.
pub fn render_storefront(catalog: &GroupedCatalog, countdown: &str) -> String {
    let nav = build_category_nav(catalog);
    let sections: String = catalog.sections().iter().map(build_section).collect();
    page_shell(countdown, &nav, &sections)
}

/// Page shown when neither the live catalog nor the snapshot could be loaded.
pub fn render_load_failure(countdown: &str) -> String {
    let message = format!(r#"<div class="load-error">{LOAD_FAILURE}</div>"#);
    page_shell(countdown, "", &message)
}

fn page_shell(countdown: &str, nav: &str, sections: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>FortShop</title>
    <link rel="stylesheet" href="/styles.css">
</head>
<body>
    <header class="shop-header">
        <h1>Item Shop</h1>
        <div class="reset-timer">Resets in <span id="countdown">{countdown}</span></div>
    </header>
    <nav id="categoryNav" class="category-nav">{nav}</nav>
    <main id="sections">{sections}</main>
    <div id="modalBackdrop" class="modal-backdrop">
        <div id="modal" class="modal"></div>
    </div>
    <script src="/app.js" defer></script>
</body>
</html>
"#,
        countdown = html_escape(countdown),
    )
}

fn build_category_nav(catalog: &GroupedCatalog) -> String {
    let mut html = String::new();
    for (index, section) in catalog.sections().iter().enumerate() {
        let active = if index == 0 { " active" } else { "" };
        html.push_str(&format!(
            r##"<a class="category-chip{active}" href="#{id}" data-target="{id}">{name}</a>"##,
            id = html_escape(&section.dom_id()),
            name = html_escape(&section.name),
        ));
    }
    html
}

fn build_section(section: &CatalogSection) -> String {
    let cards: String = section.entries.iter().map(build_card).collect();
    format!(
        r#"<section id="{id}"><h2 class="section-title">{name}</h2><div class="shop-grid">{cards}</div></section>"#,
        id = html_escape(&section.dom_id()),
        name = html_escape(&section.name),
    )
}

fn build_card(entry: &ShopEntry) -> String {
    let item = &entry.item;
    let alt = if item.display_name.is_empty() {
        FALLBACK_ALT
    } else {
        item.display_name.as_str()
    };

    format!(
        r#"<div class="item-card" data-title="{title}" data-ids="{ids}" data-poster="{poster}"><div class="item-media">{image}<span class="item-rarity {rarity_class}">{rarity}</span></div><div class="item-info"><div class="item-name">{title}</div><div class="item-type">{kind}</div><div class="item-price"><span class="vbucks-icon">V</span><span>{price}</span></div></div></div>"#,
        title = html_escape(&item.display_name),
        ids = html_escape(&json_list(&entry.granted_ids)),
        poster = html_escape(entry.primary_poster()),
        image = build_image(alt, &entry.posters),
        rarity_class = html_escape(&entry.rarity_class),
        rarity = html_escape(&item.rarity),
        kind = html_escape(&item.type_label()),
        price = html_escape(&item.price),
    )
}

fn build_image(alt: &str, posters: &[String]) -> String {
    let chain = PosterChain::new(posters);
    // The client script attaches the error handler before assigning `data-src`,
    // so no `src` is rendered here.
    let src = chain
        .current()
        .map(|src| format!(r#" data-src="{}""#, html_escape(src)))
        .unwrap_or_default();
    format!(
        r#"<img class="item-image"{src} data-fallbacks="{fallbacks}" alt="{alt}" loading="lazy" decoding="async" referrerpolicy="no-referrer">"#,
        fallbacks = html_escape(&json_list(chain.remaining())),
        alt = html_escape(alt),
    )
}

fn json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}
