use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::PgStore;
use crate::models::NewProduct;
use super::{ImportError, ImportPipeline, LineMapper};

/// Product import as wired by the binary
pub type ProductImport = ImportPipeline<ProductLineMapper, PgStore>;

/// Decimal places stored for a product price
const PRICE_SCALE: u32 = 2;

/// Maps `name;price` lines to new products, e.g. `Office chair;149.90`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductLineMapper;

impl LineMapper for ProductLineMapper {
    type Record = NewProduct;

    fn map_line(&self, line: &str) -> Result<NewProduct, ImportError> {
        let malformed = |reason: &str| ImportError::Malformed {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let (name, price) = line
            .rsplit_once(';')
            .ok_or_else(|| malformed("expected `name;price`"))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(malformed("empty product name"));
        }

        let price = Decimal::from_str(price.trim()).map_err(|e| malformed(&e.to_string()))?;
        if price.is_sign_negative() {
            return Err(malformed("negative price"));
        }
        if price.normalize().scale() > PRICE_SCALE {
            return Err(malformed("more than two decimal places in price"));
        }

        Ok(NewProduct {
            name: name.to_string(),
            price,
        })
    }
}
