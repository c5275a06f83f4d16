//! SEO services - robots.txt e sitemap.xml costruiti a partire da SITE_URL

use crate::core::{AppError, AppState};
use crate::entities::{Category, PostSitemapEntry};
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, instrument};

const SITEMAP_POSTS_LIMIT: i64 = 5000;

// (percorso, changefreq, priority)
const STATIC_ROUTES: [(&str, &str, &str); 7] = [
    ("", "daily", "1.0"),
    ("/posts", "hourly", "0.9"),
    ("/about", "monthly", "0.7"),
    ("/how-it-works", "monthly", "0.7"),
    ("/contact", "monthly", "0.6"),
    ("/terms", "monthly", "0.5"),
    ("/privacy", "monthly", "0.5"),
];

const PRIVATE_PATHS: [&str; 4] = ["/api/", "/dashboard/", "/admin/", "/auth/"];

pub async fn robots_txt(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.site_url),
    )
}

#[instrument(skip(state))]
pub async fn sitemap_xml(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let (posts, categories) = tokio::try_join!(
        state.posts.find_for_sitemap(SITEMAP_POSTS_LIMIT),
        state.categories.find_by_parent(None),
    )?;
    debug!(posts = posts.len(), categories = categories.len(), "Building sitemap");

    let body = render_sitemap(&state.site_url, Utc::now(), &posts, &categories);
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body))
}

pub fn render_robots(site_url: &str) -> String {
    let mut out = String::new();

    out.push_str("User-agent: *\nAllow: /\n");
    for path in PRIVATE_PATHS {
        let _ = writeln!(out, "Disallow: {}", path);
    }
    out.push_str("Disallow: /signup\nDisallow: /login\nDisallow: /*?*utm_*\nCrawl-delay: 1\n");

    for agent in ["Googlebot", "Bingbot"] {
        let _ = write!(out, "\nUser-agent: {}\nAllow: /\n", agent);
        for path in PRIVATE_PATHS {
            let _ = writeln!(out, "Disallow: {}", path);
        }
    }

    let _ = write!(out, "\nSitemap: {}/sitemap.xml\n", site_url);
    out
}

pub fn render_sitemap(
    site_url: &str,
    now: DateTime<Utc>,
    posts: &[PostSitemapEntry],
    root_categories: &[Category],
) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for (path, freq, priority) in STATIC_ROUTES {
        push_url(&mut out, &format!("{}{}", site_url, path), now, freq, priority);
    }

    for post in posts {
        push_url(
            &mut out,
            &format!("{}/posts/{}", site_url, post.id),
            post.updated_at.max(post.created_at),
            "daily",
            "0.8",
        );
    }

    for category in root_categories {
        push_url(
            &mut out,
            &format!("{}/posts?category={}", site_url, category.slug),
            now,
            "daily",
            "0.7",
        );
    }

    out.push_str("</urlset>\n");
    out
}

fn push_url(out: &mut String, loc: &str, last_modified: DateTime<Utc>, freq: &str, priority: &str) {
    let _ = write!(
        out,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
        xml_escape(loc),
        last_modified.to_rfc3339(),
        freq,
        priority
    );
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
