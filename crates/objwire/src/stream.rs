// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stream transport: thin wrappers around `encode`/`decode` with scoped
//! handle acquisition. File handles are closed on every exit path,
//! including errors.

use crate::codec::Codec;
use crate::error::Result;
use crate::value::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Encode `value` onto `writer` using an explicit codec.
pub fn dump_with<W: Write>(codec: &Codec, value: &Value, mut writer: W) -> Result<()> {
    let text = codec.encode(value)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Decode a value from `reader` using an explicit codec.
pub fn load_with<R: Read>(codec: &Codec, mut reader: R) -> Result<Value> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    codec.decode(&text)
}

/// Encode `value` onto `writer` with the process-wide codec.
pub fn dump<W: Write>(value: &Value, writer: W) -> Result<()> {
    dump_with(Codec::global(), value, writer)
}

/// Decode a value from `reader` with the process-wide codec.
pub fn load<R: Read>(reader: R) -> Result<Value> {
    load_with(Codec::global(), reader)
}

/// Encode `value` into a file created (or truncated) at `path`.
pub fn dump_file(value: &Value, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    dump_with(Codec::global(), value, BufWriter::new(file))
}

/// Decode a value from the file at `path`.
pub fn load_file(path: impl AsRef<Path>) -> Result<Value> {
    load_with(Codec::global(), BufReader::new(File::open(path)?))
}
