use sqlx::PgPool;

use super::repo_types::Book;

pub const SEARCH_LIMIT: i64 = 20;

/// `%query%` for ILIKE with the LIKE metacharacters escaped, so a `%` typed
/// into the search box matches a literal percent sign.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl Book {
    pub async fn find_by_isbn(db: &PgPool, isbn: &str) -> anyhow::Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, title, author, year
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(db)
        .await?;
        Ok(book)
    }

    /// Substring match on ISBN, title or author.
    pub async fn search(db: &PgPool, query: &str, limit: i64) -> anyhow::Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, title, author, year
              FROM books
             WHERE isbn ILIKE $1
                OR title ILIKE $1
                OR author ILIKE $1
             ORDER BY title
             LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_query_is_wrapped() {
        assert_eq!(like_pattern("tolkien"), "%tolkien%");
    }

    #[test]
    fn metacharacters_are_escaped() {
        assert_eq!(like_pattern("100%"), r"%100\%%");
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"c:\x"), r"%c:\\x%");
    }
}
