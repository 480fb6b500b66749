use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DbUser {
    pub username: String,
    /// Encoded password hash, see `service::password`.
    pub secret: Vec<u8>,
}

/// A shelved book. `id` is the external catalog identifier, `user` the owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Book {
    pub pk: i64,
    pub title: String,
    pub author: String,
    pub classification: String,
    pub id: String,
    pub user: String,
}

/// A book before insertion; the primary key is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub classification: String,
    pub id: String,
    pub user: String,
}

impl NewBook {
    pub fn with_pk(self, pk: i64) -> Book {
        Book {
            pk,
            title: self.title,
            author: self.author,
            classification: self.classification,
            id: self.id,
            user: self.user,
        }
    }
}
