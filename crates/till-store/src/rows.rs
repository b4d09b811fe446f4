//! # Row Reader
//!
//! Splits snapshot text into raw rows. Only the shape is checked here
//! (header and field count); field values are validated by till-core.
//!
//! ```text
//! name,price,quantity,promotion      ◄── header, must match exactly
//! cola,1000,10,soda 2+1              ◄── line 2 → RawProductRow
//!                                    ◄── blank, skipped
//! water,500,10                       ◄── line 4: FieldCount { expected 4, found 3 }
//! ```

use std::path::Path;

use till_core::catalog::PRODUCTS_HEADER;
use till_core::promotion::PROMOTIONS_HEADER;
use till_core::types::{RawProductRow, RawPromotionRow};

use crate::error::{StoreError, StoreResult};

/// Reads product rows from `products.md` text.
///
/// `path` is only used in error messages.
pub fn read_product_rows(text: &str, path: &Path) -> StoreResult<Vec<RawProductRow>> {
    read_rows(text, path, PRODUCTS_HEADER, |f| {
        RawProductRow::new(f[0], f[1], f[2], f[3])
    })
}

/// Reads promotion rows from `promotions.md` text.
pub fn read_promotion_rows(text: &str, path: &Path) -> StoreResult<Vec<RawPromotionRow>> {
    read_rows(text, path, PROMOTIONS_HEADER, |f| {
        RawPromotionRow::new(f[0], f[1], f[2], f[3], f[4])
    })
}

fn read_rows<T>(
    text: &str,
    path: &Path,
    header: &'static str,
    build: impl Fn(&[&str]) -> T,
) -> StoreResult<Vec<T>> {
    let expected = header.split(',').count();
    let mut lines = text
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    match lines.next() {
        Some((_, found)) if found == header => {}
        found => {
            return Err(StoreError::BadHeader {
                path: path.to_path_buf(),
                expected: header,
                found: found.map(|(_, l)| l.to_string()).unwrap_or_default(),
            })
        }
    }

    lines
        .map(|(line, content)| {
            let fields: Vec<&str> = content.split(',').map(str::trim).collect();
            if fields.len() != expected {
                return Err(StoreError::FieldCount {
                    path: path.to_path_buf(),
                    line,
                    expected,
                    found: fields.len(),
                });
            }
            Ok(build(&fields))
        })
        .collect()
}
