pub mod books;
pub mod login;
