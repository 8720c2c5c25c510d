//! Content hashing for extracted tables.

use cmz_extract::ExtractedTable;
use sha2::{Digest, Sha256};

use crate::TablesResult;

/// Hash of everything a consumer can observe in a table: family, header and
/// every record in row order.
pub fn content_hash(table: &ExtractedTable) -> TablesResult<String> {
    let mut hasher = Sha256::new();

    hasher.update(table.family().tag().as_bytes());
    for name in table.header() {
        hasher.update(name.as_bytes());
        hasher.update(b"\x1f");
    }

    for record in table.records() {
        let line = serde_json::to_string(record)?;
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmz_core::ModelFamily;
    use cmz_extract::{ExtractedTable, table_columns};

    fn empty(family: ModelFamily, species: &[&str]) -> ExtractedTable {
        ExtractedTable::from_parts(
            family,
            table_columns(family),
            species.iter().map(|s| s.to_string()).collect(),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn hash_stability() {
        let table = empty(ModelFamily::HotCore, &["CO"]);
        assert_eq!(
            content_hash(&table).unwrap(),
            content_hash(&table.clone()).unwrap()
        );
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = empty(ModelFamily::HotCore, &["CS"]);
        let b = empty(ModelFamily::HotCore, &["SO"]);
        let c = empty(ModelFamily::Shock, &["CS"]);
        let hash = |t: &ExtractedTable| content_hash(t).unwrap();
        assert_ne!(hash(&a), hash(&b));
        assert_ne!(hash(&a), hash(&c));
    }
}
