// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-category adapters: thin encoder strategies plus the default symbol
//! registrations.
//!
//! Each module exposes one `register` function; [`install_defaults`] is
//! the single deterministic startup routine that calls them all. Hosts
//! building a custom codec can call individual `register` functions on
//! their own [`CodecBuilder`].

pub mod arrays;
pub mod containers;
pub mod exported;
pub mod records;
pub mod refs;
pub mod scalars;

use crate::codec::CodecBuilder;

/// Install every default adapter.
pub fn install_defaults(builder: &mut CodecBuilder) {
    scalars::register(builder);
    containers::register(builder);
    records::register(builder);
    arrays::register(builder);
    refs::register(builder);
    exported::register(builder);
}

#[cfg(test)]
mod tests;
