//! Bare HTML for the two browser pages. Every interpolated value is escaped.

use std::fmt::Write;

use crate::db::Book;
use crate::types::catalog::{CatalogFilter, SortColumn};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Bookworm - Login</title></head>
<body>
{error}
<form method="POST" action="/login">
  <input type="text" name="username" placeholder="Username">
  <input type="password" name="password" placeholder="Password">
  <input type="submit" name="register" value="Register">
  <input type="submit" name="login" value="Log In">
</form>
</body>
</html>"#
    )
}

pub fn catalog_page(user: &str, filter: CatalogFilter, sort: SortColumn, books: &[Book]) -> String {
    let mut rows = String::new();
    for b in books {
        let _ = write!(
            rows,
            "<tr id=\"book-row-{}\"><td>{}</td><td>{}</td><td>{}</td></tr>",
            b.pk,
            escape(&b.title),
            escape(&b.author),
            escape(&b.classification)
        );
    }
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Bookworm</title></head>
<body data-filter="{filter}" data-sort="{sort}">
<p>Signed in as {user} - <a href="/logout">Log out</a></p>
<table>
<thead><tr><th>Title</th><th>Author</th><th>Classification</th></tr></thead>
<tbody>{rows}</tbody>
</table>
</body>
</html>"#,
        user = escape(user),
    )
}
