//! Files generated from the indexes.

pub mod sitemap;
