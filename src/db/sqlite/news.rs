//! News rows, insert-only and unique by link

use crate::db::sqlite::models::NewsItem;
use crate::error::Result;
use crate::sources::types::NewsArticle;
use chrono::Utc;
use rusqlite::{params, Connection};

/// Insert every article whose link is not stored yet; commits once.
/// Returns the number of new rows.
pub fn apply_news(conn: &mut Connection, articles: &[NewsArticle]) -> Result<usize> {
    let tx = conn.transaction()?;
    let now = Utc::now();
    let mut inserted = 0;

    {
        let mut exists = tx.prepare("SELECT EXISTS(SELECT 1 FROM news WHERE link = ?1)")?;
        let mut insert = tx.prepare(
            "INSERT INTO news (title, link, source, published) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for article in articles {
            let known: bool = exists.query_row(params![article.link], |row| row.get(0))?;
            if known {
                tracing::debug!("Skipping known article: {}", article.link);
                continue;
            }

            insert.execute(params![article.title, article.link, article.source, now])?;
            inserted += 1;
        }
    }

    tx.commit()?;

    tracing::info!("Added {} news articles ({} already stored)", inserted, articles.len() - inserted);
    Ok(inserted)
}

/// Most recent `limit` articles, newest first
pub fn latest_news(conn: &Connection, limit: u32) -> Result<Vec<NewsItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, link, source, published
         FROM news ORDER BY published DESC, id DESC LIMIT ?1",
    )?;

    let items = stmt
        .query_map(params![limit], |row| {
            Ok(NewsItem {
                id: row.get(0)?,
                title: row.get(1)?,
                link: row.get(2)?,
                source: row.get(3)?,
                published: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(items)
}

pub fn count_news(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::migrations::run_migrations;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn article(title: &str, link: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            link: link.to_string(),
            source: "CoinDesk".to_string(),
        }
    }

    #[test]
    fn test_known_link_is_not_duplicated() {
        let mut conn = create_test_db();

        let added = apply_news(&mut conn, &[article("Bitcoin rallies again", "https://a/1")]).unwrap();
        assert_eq!(added, 1);

        // same link, different title
        let added = apply_news(
            &mut conn,
            &[
                article("Bitcoin rallies once more", "https://a/1"),
                article("Ether upgrade ships", "https://a/2"),
            ],
        )
        .unwrap();
        assert_eq!(added, 1);
        assert_eq!(count_news(&conn).unwrap(), 2);

        let items = latest_news(&conn, 10).unwrap();
        let first = items.iter().find(|n| n.link == "https://a/1").unwrap();
        assert_eq!(first.title, "Bitcoin rallies again");
    }

    #[test]
    fn test_duplicate_link_within_batch() {
        let mut conn = create_test_db();
        let added = apply_news(
            &mut conn,
            &[article("First headline here", "https://a/x"), article("Second headline here", "https://a/x")],
        )
        .unwrap();

        assert_eq!(added, 1);
        assert_eq!(count_news(&conn).unwrap(), 1);
    }

    #[test]
    fn test_latest_news_newest_first() {
        let mut conn = create_test_db();
        apply_news(&mut conn, &[article("Older headline text", "https://a/old")]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        apply_news(&mut conn, &[article("Newer headline text", "https://a/new")]).unwrap();

        let items = latest_news(&conn, 10).unwrap();
        assert_eq!(items[0].link, "https://a/new");
        assert_eq!(items[1].link, "https://a/old");

        assert_eq!(latest_news(&conn, 1).unwrap().len(), 1);
    }
}
