pub mod rest;
pub mod transport;
