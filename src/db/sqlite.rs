use crate::db::models::{Book, DbUser, NewBook};
use crate::db::schema::SQLITE_INIT;
use crate::error::BookwormError;
use crate::types::catalog::{CatalogFilter, SortColumn};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection, Pool, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

const BOOK_COLUMNS: &str = "pk, title, author, classification, id, user";

#[derive(Clone)]
pub struct BookStorage {
    pool: SqlitePool,
}

impl BookStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, BookwormError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), BookwormError> {
        // sqlx::query runs a single statement, so split the script
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Round-trip to the database. Fails with `StoreUnavailable`.
    pub async fn ping(&self) -> Result<(), BookwormError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(BookwormError::StoreUnavailable)?;
        conn.ping().await.map_err(BookwormError::StoreUnavailable)
    }

    /// Insert a new user. Fails with `UserExists` when the username is taken.
    pub async fn insert_user(&self, user: &DbUser) -> Result<(), BookwormError> {
        sqlx::query("INSERT INTO users (username, secret) VALUES (?, ?)")
            .bind(&user.username)
            .bind(&user.secret)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let taken = e
                    .as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation());
                if taken {
                    BookwormError::UserExists(user.username.clone())
                } else {
                    BookwormError::Database(e)
                }
            })?;
        Ok(())
    }

    pub async fn get_user(&self, username: &str) -> Result<Option<DbUser>, BookwormError> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT username, secret FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Books owned by `owner`, restricted by `filter` and ordered by `sort`.
    pub async fn list_books(
        &self,
        owner: &str,
        sort: SortColumn,
        filter: CatalogFilter,
    ) -> Result<Vec<Book>, BookwormError> {
        // Both fragments come from closed enums, never from request input.
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user = ?{}{}",
            filter.sql_predicate(),
            sort.sql_order()
        );
        debug!(owner, %sort, %filter, "listing books");
        let mut query = sqlx::query_as::<_, Book>(&sql).bind(owner);
        if let Some((lo, hi)) = filter.sql_bounds() {
            query = query.bind(lo).bind(hi);
        }
        let books = query.fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Insert a book and return it with its generated primary key.
    pub async fn insert_book(&self, book: NewBook) -> Result<Book, BookwormError> {
        let res = sqlx::query(
            "INSERT INTO books (title, author, classification, id, user) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.classification)
        .bind(&book.id)
        .bind(&book.user)
        .execute(&self.pool)
        .await?;
        Ok(book.with_pk(res.last_insert_rowid()))
    }

    /// Delete `pk` only if it belongs to `owner`; another owner's row reads as `BookNotFound`.
    pub async fn delete_book(&self, owner: &str, pk: i64) -> Result<(), BookwormError> {
        let res = sqlx::query("DELETE FROM books WHERE pk = ? AND user = ?")
            .bind(pk)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(BookwormError::BookNotFound(pk));
        }
        Ok(())
    }
}
