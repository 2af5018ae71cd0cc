//! FIFO cost-basis capital gains for cryptocurrency trades.
//!
//! Trades are sorted chronologically and replayed against a per-currency
//! ledger of acquisition lots. Disposals consume the oldest lots first and
//! realize `(disposal rate - lot rate) * amount`; the lots left over are the
//! open positions to carry into the next accounting period.
//!
//! All monetary arithmetic uses `rust_decimal` exactly; binary floating
//! point never enters the calculation.

pub mod app;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod loader;
pub mod reports;
pub mod trade;
