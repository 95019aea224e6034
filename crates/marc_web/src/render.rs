use axum::response::Html;
use marc_core::handoff::encode;
use marc_core::{
    ArticleDetail, ArticleRecord, Category, DateFormatter, DetailView, Identity, NewsQuery,
    QuerySpec,
};

use crate::{HOME_PATH, LOGOUT_PATH};

pub const NOT_FOUND_MESSAGE: &str = "Data artikel tidak ditemukan.";
pub const EMPTY_LIST_MESSAGE: &str = "Tidak ada berita yang tersedia saat ini.";
pub const LOADING_MESSAGE: &str = "Loading session...";
pub const CATEGORY_IGNORED_NOTICE: &str = "Filter kategori tidak diterapkan selama pencarian.";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only plain web links make it into `href`/`src`.
fn web_link(url: &str) -> Option<&str> {
    let lower = url.trim_start().to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then_some(url)
}

fn layout(title: &str, head: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n{}</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        head,
        body
    ))
}

fn back_home() -> String {
    format!("<p class=\"back\"><a href=\"{}\">Kembali ke Beranda</a></p>", HOME_PATH)
}

/// Shown while the session has not resolved; reloads itself.
pub fn loading_page() -> Html<String> {
    layout(
        "MARC PORTAL",
        "<meta http-equiv=\"refresh\" content=\"2\">\n",
        &format!("<main class=\"loading\"><p>{}</p></main>", LOADING_MESSAGE),
    )
}

pub fn login_page(sign_in_url: &str) -> Html<String> {
    layout(
        "Halaman Login",
        "",
        &format!(
            "<main class=\"login\">\n<h1>Halaman Login</h1>\n\
             <p>Anda perlu login untuk melihat berita.</p>\n\
             <a class=\"button\" href=\"{}\">Login dengan Google</a>\n</main>",
            escape(sign_in_url)
        ),
    )
}

pub fn error_page(message: &str) -> Html<String> {
    layout(
        "MARC PORTAL",
        "",
        &format!("<main class=\"error\"><p>Error: {}</p></main>", escape(message)),
    )
}

pub struct IndexView<'a> {
    pub identity: &'a Identity,
    pub spec: &'a QuerySpec,
    pub query: &'a NewsQuery,
    pub articles: &'a [ArticleRecord],
}

pub fn index_page(view: &IndexView<'_>, dates: &DateFormatter) -> Html<String> {
    let mut body = String::from("<main class=\"portal\">\n<h1>MARC PORTAL</h1>\n");

    body.push_str("<header>\n");
    body.push_str(&format!(
        "<p class=\"welcome\">Selamat datang, {}!</p>\n",
        escape(&view.identity.name)
    ));
    if !view.spec.term.is_empty() {
        body.push_str(&format!(
            "<p>Menampilkan hasil pencarian untuk: <strong>{}</strong></p>\n",
            escape(&view.spec.term)
        ));
    }
    if !view.spec.category.is_empty() {
        body.push_str(&format!(
            "<p>Filter Kategori: <strong>{}</strong></p>\n",
            escape(&view.spec.category)
        ));
    }
    if view.query.ignored_category().is_some() {
        body.push_str(&format!("<p class=\"notice\">{}</p>\n", CATEGORY_IGNORED_NOTICE));
    }
    body.push_str(&format!("<a class=\"button\" href=\"{}\">Logout</a>\n</header>\n", LOGOUT_PATH));

    body.push_str(&search_form(view.spec));

    body.push_str("<h2>Berita Terbaru</h2>\n");
    if view.articles.is_empty() {
        body.push_str(&format!("<p class=\"empty\">{}</p>\n", EMPTY_LIST_MESSAGE));
    } else {
        body.push_str("<section class=\"articles\">\n");
        for article in view.articles {
            body.push_str(&article_card(article, dates));
        }
        body.push_str("</section>\n");
    }
    body.push_str("</main>");

    layout("MARC PORTAL", "", &body)
}

fn search_form(spec: &QuerySpec) -> String {
    let mut options = format!(
        "<option value=\"\"{}>Semua Kategori</option>\n",
        selected(spec.category.is_empty())
    );
    for category in Category::ALL {
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            category.as_str(),
            selected(spec.category == category.as_str()),
            category.label()
        ));
    }
    format!(
        "<form method=\"get\" action=\"{}\">\n\
         <input type=\"text\" name=\"q\" placeholder=\"Cari berita...\" value=\"{}\">\n\
         <label for=\"category-filter\">Filter Kategori:</label>\n\
         <select id=\"category-filter\" name=\"category\">\n{}</select>\n\
         <button type=\"submit\">Cari</button>\n</form>\n",
        HOME_PATH,
        escape(&spec.term),
        options
    )
}

fn selected(yes: bool) -> &'static str {
    if yes {
        " selected"
    } else {
        ""
    }
}

fn article_card(article: &ArticleRecord, dates: &DateFormatter) -> String {
    let title = article.title().unwrap_or_default();
    let mut card = String::from("<article class=\"card\">\n");
    if let Some(image) = article.url_to_image.as_deref().and_then(web_link) {
        card.push_str(&format!("<img src=\"{}\" alt=\"{}\">\n", escape(image), escape(title)));
    }
    card.push_str(&format!("<h3>{}</h3>\n", escape(title)));
    // Cards only mention the date when the record has one.
    if article.published_at.as_deref().is_some_and(|d| !d.is_empty()) {
        card.push_str(&format!(
            "<p class=\"date\">Dipublikasikan: {}</p>\n",
            escape(dates.format(article.published_at.as_deref()).as_str())
        ));
    }
    if let Some(description) = article.description.as_deref() {
        card.push_str(&format!("<p>{}</p>\n", escape(description)));
    }
    if article.url.as_deref().is_some_and(|u| !u.is_empty()) {
        card.push_str(&format!(
            "<a class=\"more\" href=\"{}\">Baca Selengkapnya</a>\n",
            escape(&encode(article))
        ));
    }
    card.push_str("</article>\n");
    card
}

pub fn detail_page(view: &DetailView) -> Html<String> {
    match view {
        DetailView::NotFound => layout(
            "MARC PORTAL",
            "",
            &format!("<main class=\"not-found\"><p>{}</p>\n{}</main>", NOT_FOUND_MESSAGE, back_home()),
        ),
        DetailView::Article(detail) => layout(&detail.title, "", &article_body(detail)),
    }
}

fn article_body(detail: &ArticleDetail) -> String {
    let mut body = format!("<main class=\"detail\">\n<h1>{}</h1>\n<div class=\"meta\">\n", escape(&detail.title));
    if let Some(source) = &detail.source_name {
        body.push_str(&format!("<p>Sumber: {}</p>\n", escape(source)));
    }
    if let Some(author) = &detail.author {
        body.push_str(&format!("<p>Penulis: {}</p>\n", escape(author)));
    }
    body.push_str(&format!(
        "<p class=\"date\">Dipublikasikan: {}</p>\n</div>\n",
        escape(detail.published.as_str())
    ));
    if let Some(image) = detail.image_url.as_deref().and_then(web_link) {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape(image),
            escape(&detail.title)
        ));
    }
    if let Some(description) = &detail.description {
        body.push_str(&format!("<p class=\"description\">{}</p>\n", escape(description)));
    }
    if let Some(content) = &detail.content {
        body.push_str(&format!("<div class=\"content\"><p>{}</p></div>\n", escape(content)));
    }
    if let Some(url) = detail.url.as_deref().and_then(web_link) {
        body.push_str(&format!(
            "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Baca Artikel Asli di Sumber</a></p>\n",
            escape(url)
        ));
    }
    body.push_str(&back_home());
    body.push_str("\n</main>");
    body
}
