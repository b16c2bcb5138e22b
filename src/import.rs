//! Bulk load of the book catalog from CSV (`isbn,title,author,year`).

use std::io::Read;

use anyhow::Context;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookRecord {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: u64,
    pub skipped: u64,
}

/// Parse every row up front so a malformed file imports nothing.
pub fn read_books<R: Read>(reader: R) -> anyhow::Result<Vec<BookRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut books = Vec::new();
    for row in rdr.deserialize::<BookRecord>() {
        books.push(row.context("parse books CSV")?);
    }
    Ok(books)
}

/// Insert all books in one transaction. Rows whose ISBN already exists are
/// left untouched and counted as skipped.
pub async fn import_books(db: &PgPool, books: &[BookRecord]) -> anyhow::Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut tx = db.begin().await.context("begin tx")?;
    for book in books {
        let res = sqlx::query(
            r#"
            INSERT INTO books (isbn, title, author, year)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("insert book {}", book.isbn))?;

        if res.rows_affected() == 1 {
            summary.inserted += 1;
        } else {
            debug!(isbn = %book.isbn, "book already present");
            summary.skipped += 1;
        }
    }
    tx.commit().await.context("commit tx")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_header() {
        let csv = "isbn,title,author,year\n\
                   0380795272,Krondor: The Betrayal,Raymond E. Feist,1998\n\
                   1416949658, The Dark Is Rising ,Susan Cooper,1973\n";
        let books = read_books(csv.as_bytes()).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(
            books[1],
            BookRecord {
                isbn: "1416949658".into(),
                title: "The Dark Is Rising".into(),
                author: "Susan Cooper".into(),
                year: 1973,
            }
        );
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let csv = "isbn,title,author,year\n\
                   0441172717,\"Dune, Deluxe Edition\",Frank Herbert,1965\n";
        let books = read_books(csv.as_bytes()).unwrap();
        assert_eq!(books[0].title, "Dune, Deluxe Edition");
    }

    #[test]
    fn bad_year_reports_line() {
        let csv = "isbn,title,author,year\n\
                   0380795272,Krondor,Raymond E. Feist,1998\n\
                   1416949658,The Dark Is Rising,Susan Cooper,soon\n";
        let err = read_books(csv.as_bytes()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("parse books CSV"));
        assert!(msg.contains("line: 3"), "{msg}");
    }

    #[test]
    fn empty_file_has_no_books() {
        assert!(read_books("isbn,title,author,year\n".as_bytes())
            .unwrap()
            .is_empty());
    }
}
