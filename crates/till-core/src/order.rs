//! # Order Parsing
//!
//! Parses the two kinds of console input the checkout accepts: the purchase
//! request line and Y/N confirmation answers.
//!
//! ## Purchase Request Grammar
//! ```text
//! request  := item ( "," item )*
//! item     := "[" name "-" quantity "]"
//! name     := any text; the LAST "-" separates it from the quantity
//! quantity := ASCII digits, value > 0
//!
//! [cola-2],[water-1]      → cola × 2, water × 1
//! [coca-cola-2]           → "coca-cola" × 2
//! [cola-2],[cola-1]       → cola × 3 (merged, first position kept)
//! ```
//!
//! Nothing here looks at the catalog; unknown products are reported by the
//! pricing engine.

use serde::Serialize;

use crate::error::InputFormatError;

/// One product and quantity from a purchase request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
}

/// Parses a purchase request line.
///
/// ## Example
/// ```rust
/// use till_core::order::parse_purchase_request;
///
/// let items = parse_purchase_request("[cola-2], [water-1]").unwrap();
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[0].name, "cola");
/// assert_eq!(items[1].quantity, 1);
///
/// assert!(parse_purchase_request("cola-2").is_err());
/// ```
pub fn parse_purchase_request(input: &str) -> Result<Vec<OrderItem>, InputFormatError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputFormatError::EmptyRequest);
    }

    let mut items: Vec<OrderItem> = Vec::new();
    for raw in input.split(',') {
        let item = parse_item(raw.trim())?;
        match items.iter_mut().find(|i| i.name == item.name) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(item.quantity).ok_or_else(|| {
                    InputFormatError::InvalidQuantity {
                        name: item.name.clone(),
                        value: "too large".to_string(),
                    }
                })?;
            }
            None => items.push(item),
        }
    }

    Ok(items)
}

fn parse_item(item: &str) -> Result<OrderItem, InputFormatError> {
    let malformed = |reason| InputFormatError::MalformedItem {
        item: item.to_string(),
        reason,
    };

    if item.is_empty() {
        return Err(malformed("empty item"));
    }
    let inner = item
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| malformed("expected [name-quantity]"))?;

    let (name, quantity) = inner
        .rsplit_once('-')
        .ok_or_else(|| malformed("missing '-' between name and quantity"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(malformed("missing product name"));
    }
    if name.contains(['[', ']']) {
        return Err(malformed("items must be separated by ','"));
    }

    Ok(OrderItem {
        name: name.to_string(),
        quantity: parse_order_quantity(name, quantity.trim())?,
    })
}

fn parse_order_quantity(name: &str, value: &str) -> Result<u32, InputFormatError> {
    let invalid = || InputFormatError::InvalidQuantity {
        name: name.to_string(),
        value: value.to_string(),
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match value.parse::<u32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(quantity) => Ok(quantity),
    }
}

/// Parses a `Y`/`N` answer.
///
/// Surrounding whitespace is ignored; the letter is case-sensitive.
pub fn parse_confirmation(input: &str) -> Result<bool, InputFormatError> {
    match input.trim() {
        "Y" => Ok(true),
        "N" => Ok(false),
        other => Err(InputFormatError::InvalidAnswer(other.to_string())),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: u32) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_parse_single_and_multiple_items() {
        assert_eq!(
            parse_purchase_request("[cola-10]").unwrap(),
            vec![item("cola", 10)]
        );
        assert_eq!(
            parse_purchase_request(" [cola-2],[energy bar-5] ").unwrap(),
            vec![item("cola", 2), item("energy bar", 5)]
        );
    }

    #[test]
    fn test_name_may_contain_dash() {
        assert_eq!(
            parse_purchase_request("[coca-cola-3]").unwrap(),
            vec![item("coca-cola", 3)]
        );
    }

    #[test]
    fn test_repeated_names_are_merged() {
        assert_eq!(
            parse_purchase_request("[cola-2],[water-1],[cola-4]").unwrap(),
            vec![item("cola", 6), item("water", 1)]
        );
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(
            parse_purchase_request("   ").unwrap_err(),
            InputFormatError::EmptyRequest
        );
    }

    #[test]
    fn test_malformed_items() {
        for input in [
            "cola-2",
            "[cola-2",
            "cola-2]",
            "[cola2]",
            "[-2]",
            "[cola-2],",
            "[cola-2];[water-1]",
        ] {
            let err = parse_purchase_request(input).unwrap_err();
            assert!(
                matches!(
                    err,
                    InputFormatError::MalformedItem { .. } | InputFormatError::InvalidQuantity { .. }
                ),
                "{input} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_quantities() {
        for input in ["[cola-0]", "[cola-two]", "[cola-]", "[cola-+3]"] {
            let err = parse_purchase_request(input).unwrap_err();
            assert!(
                matches!(err, InputFormatError::InvalidQuantity { .. }),
                "{input} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_merge_overflow_is_rejected() {
        let err = parse_purchase_request("[cola-4294967295],[cola-1]").unwrap_err();
        assert!(matches!(err, InputFormatError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_parse_confirmation() {
        assert!(parse_confirmation("Y").unwrap());
        assert!(!parse_confirmation(" N\n").unwrap());
        assert_eq!(
            parse_confirmation("y").unwrap_err(),
            InputFormatError::InvalidAnswer("y".to_string())
        );
        assert!(parse_confirmation("").is_err());
        assert!(parse_confirmation("YES").is_err());
    }
}
