// Domain layer: the institution data model, seed data, read-only catalog queries and ports.

pub mod catalog;
pub mod model;
pub mod ports;
pub mod seed;
