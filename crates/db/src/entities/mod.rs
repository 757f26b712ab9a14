//! `SeaORM` entity definitions.

pub mod images;
