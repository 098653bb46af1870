use tracing::debug;

use crate::{
    errors::DataError,
    structs::{Action, ActivityEvent, PositionBook, Snapshot},
};

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum EngineState {
    Uninitialized,
    Processing,
}

/* Counters of one pass, logged by the workflow */
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct EngineSummary {
    pub buys: usize,
    pub sells: usize,
    pub clamped_sells: usize,
    pub pools: usize,
    pub open_positions: usize,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EngineOutput {
    pub snapshot: Snapshot,
    pub summary: EngineSummary,
}

/* Single deterministic pass over time ordered events.

The engine owns its PositionBook: `apply` routes each event to the pool of its key, `finish` consumes
the engine and hands back the snapshot. There is no way to feed a finished engine, and no shared state
between two engines.
*/
#[derive(Debug, Clone)]
pub struct CostBasisEngine {
    state: EngineState,
    book: PositionBook,
    summary: EngineSummary,
}

impl CostBasisEngine {
    pub fn new() -> Self {
        return CostBasisEngine {
            state: EngineState::Uninitialized,
            book: PositionBook::new(),
            summary: EngineSummary::default(),
        };
    }

    pub fn state(&self) -> EngineState {
        return self.state;
    }

    pub fn book(&self) -> &PositionBook {
        return &self.book;
    }

    /* Events must come in timestamp order, the normalizer guarantees it. An event whose totals leave
    the Decimal range is rejected and the pool keeps its previous state. */
    pub fn apply(&mut self, event: &ActivityEvent) -> Result<(), DataError> {
        self.state = EngineState::Processing;
        let pool = self.book.get_or_create(event.key());

        match event.action {
            Action::Buy => {
                pool.apply_buy(event)?;
                self.summary.buys += 1;
            }
            Action::Sell => {
                let outcome = pool.apply_sell(event)?;
                self.summary.sells += 1;
                if outcome.clamped {
                    self.summary.clamped_sells += 1;
                }
            }
        }
        debug!(
            "{} {} {} -> quantity {}",
            event.action, event.quantity, pool.key, pool.quantity
        );
        Ok(())
    }

    pub fn finish(self) -> EngineOutput {
        let mut summary = self.summary;
        summary.pools = self.book.len();
        let snapshot = self.book.into_snapshot();
        summary.open_positions = snapshot.len();

        return EngineOutput { snapshot, summary };
    }

    pub fn run<'a>(events: impl IntoIterator<Item = &'a ActivityEvent>) -> Result<EngineOutput, DataError> {
        let mut engine = CostBasisEngine::new();
        for event in events {
            engine.apply(event)?;
        }
        return Ok(engine.finish());
    }
}

impl Default for CostBasisEngine {
    fn default() -> Self {
        Self::new()
    }
}
