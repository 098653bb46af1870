use hashbrown::HashMap;

use crate::structs::{HoldingRow, PositionKey, PositionPool, Snapshot};

/* All pools of one engine run. It is created empty by the engine, owned by it for the whole pass,
and turned into a Snapshot at the end: nothing survives between runs. */
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    pools: HashMap<PositionKey, PositionPool>,
}

impl PositionBook {
    pub fn new() -> Self {
        return PositionBook {
            pools: HashMap::new(),
        };
    }

    pub fn get(&self, key: &PositionKey) -> Option<&PositionPool> {
        return self.pools.get(key);
    }

    /* Pools are created lazily, the first time an event references the key */
    pub fn get_or_create(&mut self, key: PositionKey) -> &mut PositionPool {
        return self
            .pools
            .entry(key.clone())
            .or_insert_with(|| PositionPool::new(key));
    }

    pub fn len(&self) -> usize {
        return self.pools.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.pools.is_empty();
    }

    pub fn pools(&self) -> impl Iterator<Item = &PositionPool> {
        return self.pools.values();
    }

    /* Zero quantity pools are left out, the rest sorted by key so two runs give the same bytes */
    pub fn into_snapshot(self) -> Snapshot {
        let mut open: Vec<PositionPool> = self
            .pools
            .into_values()
            .filter(|pool| !pool.is_empty())
            .collect();
        open.sort_by(|a, b| a.key.cmp(&b.key));

        return Snapshot {
            holdings: open.iter().map(HoldingRow::from_pool).collect(),
        };
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_currency_isolation() {
        let mut book = PositionBook::new();
        book.get_or_create(PositionKey::new("SHEL", "GBP")).quantity = dec!(5);
        book.get_or_create(PositionKey::new("SHEL", "USD")).quantity = dec!(7);

        assert_eq!(book.len(), 2);
        assert_eq!(book.get(&PositionKey::new("SHEL", "GBP")).unwrap().quantity, dec!(5));
        assert_eq!(book.get(&PositionKey::new("SHEL", "USD")).unwrap().quantity, dec!(7));
    }

    #[test]
    fn test_snapshot_drops_empty_and_sorts() {
        let mut book = PositionBook::new();
        book.get_or_create(PositionKey::new("VOD", "GBP")).quantity = dec!(1);
        book.get_or_create(PositionKey::new("AAPL", "USD")).quantity = dec!(2);
        book.get_or_create(PositionKey::new("BP.", "GBP"));

        let snapshot = book.into_snapshot();
        let tickers: Vec<&str> = snapshot.holdings.iter().map(|h| h.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "VOD"]);
    }
}
