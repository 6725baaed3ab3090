//! Database subsystem for sheetdb
//!
//! A [`Database`] binds one workbook to a grid collaborator and hands out
//! [`Table`](crate::table::Table) views by worksheet title. It also covers
//! worksheet lifecycle: create, drop, rename and duplicate.

mod database;

pub use database::Database;
