//! Server-rendered pages. Every value that did not come from this file goes
//! through [`escape`].

use std::fmt::Write;

use crate::books::{book_path, repo_types::Book, services::Enrichment};
use crate::reviews::{
    repo_types::{RatingStats, ReviewWithAuthor},
    services::{MAX_RATING, MIN_RATING},
};

const STYLE: &str = r#"
    body { font-family: system-ui, -apple-system, sans-serif; max-width: 860px; margin: 30px auto; padding: 0 20px; line-height: 1.5; color: #222; }
    nav { display: flex; gap: 16px; border-bottom: 2px solid #0066cc; padding-bottom: 8px; margin-bottom: 24px; }
    nav a { color: #0066cc; text-decoration: none; }
    form.stack { display: flex; flex-direction: column; gap: 10px; max-width: 360px; }
    input, select, textarea, button { font: inherit; padding: 6px 8px; }
    button { background: #0066cc; color: white; border: 0; border-radius: 4px; cursor: pointer; }
    table { border-collapse: collapse; width: 100%; }
    th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #ddd; }
    .meta { color: #666; }
    .review { border-bottom: 1px solid #eee; padding: 10px 0; }
    .cover { float: right; margin-left: 20px; }
    .summary { background: #f4f8ff; border-left: 4px solid #0066cc; padding: 8px 12px; }
"#;

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn layout(title: &str, logged_in: bool, body: &str) -> String {
    let nav = if logged_in {
        r#"<a href="/search">Search</a><a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/login">Log in</a><a href="/register">Register</a>"#
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Book Reviews</title>
    <style>{STYLE}</style>
</head>
<body>
    <nav>{nav}</nav>
    {body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn credentials_form(action: &str, heading: &str, button: &str) -> String {
    format!(
        r#"<h1>{heading}</h1>
    <form class="stack" action="{action}" method="post">
        <input name="username" placeholder="Username" autocomplete="username" autofocus>
        <input name="password" type="password" placeholder="Password">
        <button type="submit">{button}</button>
    </form>"#
    )
}

pub fn login_page() -> String {
    layout(
        "Log in",
        false,
        &credentials_form("/login", "Log in", "Log in"),
    )
}

pub fn register_page() -> String {
    layout(
        "Register",
        false,
        &credentials_form("/register", "Create an account", "Register"),
    )
}

/// Search form, plus a result table once a query was run.
pub fn search_page(query: Option<&str>, results: Option<&[Book]>) -> String {
    let mut body = format!(
        r#"<h1>Search books</h1>
    <form action="/search" method="post">
        <input name="query" value="{}" placeholder="ISBN, title or author" size="40" autofocus>
        <button type="submit">Search</button>
    </form>"#,
        escape(query.unwrap_or_default())
    );

    match results {
        None => {}
        Some([]) => body.push_str(r#"<p class="meta">No books matched.</p>"#),
        Some(books) => {
            body.push_str("<table><tr><th>Title</th><th>Author</th><th>Year</th><th>ISBN</th></tr>");
            for book in books {
                let _ = write!(
                    body,
                    r#"<tr><td><a href="{href}">{title}</a></td><td>{author}</td><td>{year}</td><td>{isbn}</td></tr>"#,
                    href = escape(&book_path(&book.isbn)),
                    isbn = escape(&book.isbn),
                    title = escape(&book.title),
                    author = escape(&book.author),
                    year = book.year,
                );
            }
            body.push_str("</table>");
        }
    }

    layout("Search", true, &body)
}

pub struct BookView<'a> {
    pub book: &'a Book,
    pub reviews: &'a [ReviewWithAuthor],
    pub stats: &'a RatingStats,
    pub enrichment: &'a Enrichment,
    pub can_review: bool,
}

fn stars(rating: i32) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    let mut out = "★".repeat(filled);
    out.push_str(&"☆".repeat(MAX_RATING as usize - filled));
    out
}

fn rating_line(stats: &RatingStats) -> String {
    match stats.rounded_average() {
        Some(avg) => format!(
            "Average rating {avg:.2} / {MAX_RATING} from {} review{}",
            stats.review_count,
            if stats.review_count == 1 { "" } else { "s" }
        ),
        None => "No reviews yet".to_string(),
    }
}

pub fn book_page(view: &BookView<'_>) -> String {
    let book = view.book;
    let mut body = String::new();

    let volume = view.enrichment.volume.as_ref();
    if let Some(src) = volume.and_then(|v| v.thumbnail()) {
        let _ = write!(body, r#"<img class="cover" src="{}" alt="cover">"#, escape(src));
    }

    let _ = write!(
        body,
        r#"<h1>{title}</h1>
    <p>by {author}, {year}</p>
    <p class="meta">ISBN {isbn}</p>
    <p><strong>{rating}</strong></p>"#,
        title = escape(&book.title),
        author = escape(&book.author),
        year = book.year,
        isbn = escape(&book.isbn),
        rating = rating_line(view.stats),
    );

    if let Some(v) = volume {
        if let Some(published) = v.published_date.as_deref() {
            let _ = write!(body, r#"<p class="meta">Published {}</p>"#, escape(published));
        }
        if let (Some(avg), Some(count)) = (v.average_rating, v.ratings_count) {
            let _ = write!(
                body,
                r#"<p class="meta">Google Books: {avg:.1} / 5 from {count} ratings</p>"#
            );
        }
    }

    if let Some(summary) = view.enrichment.summary.as_deref() {
        let _ = write!(body, r#"<p class="summary">{}</p>"#, escape(summary));
    } else if let Some(desc) = volume.and_then(|v| v.description.as_deref()) {
        let _ = write!(body, "<p>{}</p>", escape(desc));
    }

    if view.can_review {
        let mut options = String::new();
        for r in (MIN_RATING..=MAX_RATING).rev() {
            let _ = write!(options, r#"<option value="{r}">{r} - {}</option>"#, stars(r));
        }
        let _ = write!(
            body,
            r#"<h2>Your review</h2>
    <form class="stack" action="{action}" method="post">
        <select name="rating">{options}</select>
        <textarea name="review" rows="4" placeholder="What did you think?"></textarea>
        <button type="submit">Submit review</button>
    </form>"#,
            action = escape(&book_path(&book.isbn)),
        );
    } else {
        body.push_str(r#"<p class="meta">You have reviewed this book.</p>"#);
    }

    body.push_str("<h2>Reviews</h2>");
    if view.reviews.is_empty() {
        body.push_str(r#"<p class="meta">Be the first to review this book.</p>"#);
    }
    for review in view.reviews {
        let _ = write!(
            body,
            r#"<div class="review"><strong>{user}</strong> <span title="{rating} / {MAX_RATING}">{stars}</span><p>{text}</p></div>"#,
            user = escape(&review.username),
            rating = review.rating,
            stars = stars(review.rating),
            text = escape(review.review.as_deref().unwrap_or_default()),
        );
    }

    layout(&book.title, true, &body)
}
