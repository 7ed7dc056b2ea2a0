//! Rust client library for the Souk marketplace API.
//!
//! This crate provides a typed client for a multi-category marketplace
//! (shopping products, restaurants, real estate, cars): an in-memory
//! catalog with composable filters, a shopping cart with well-defined
//! merge semantics, an authentication session persisted to durable
//! storage, and an order submission flow that degrades to a pre-filled
//! chat deep link when the API is unreachable or the user is anonymous.
//!
//! Use the high-level [`souk::Souk`] (async) or [`souk::SoukBlocking`]
//! facade for the full flow, or the low-level pieces directly.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod models;
pub mod notice;
pub mod session;
pub mod storage;

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod souk;
