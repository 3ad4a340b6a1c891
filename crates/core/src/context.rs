//! Block apply context.
//!
//! A [`Context`] scopes one sequential apply pass (a message or a block hook)
//! over the shared store. It carries the block coordinates, collects emitted
//! events, and meters gas for the apply path. The host creates one context
//! per transaction or hook and drains its events afterwards.

use crate::coins::DecCoins;
use crate::event::Event;
use crate::gas::GasMeter;
use crate::store::Store;

/// Execution context for one apply pass.
pub struct Context<'a> {
    store: &'a mut dyn Store,
    chain_id: String,
    block_height: u64,
    block_time: u64,
    min_gas_prices: DecCoins,
    gas: GasMeter,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    /// Creates a context over `store` at the given block coordinates.
    pub fn new(
        store: &'a mut dyn Store,
        chain_id: impl Into<String>,
        block_height: u64,
        block_time: u64,
    ) -> Self {
        Self {
            store,
            chain_id: chain_id.into(),
            block_height,
            block_time,
            min_gas_prices: Vec::new(),
            gas: GasMeter::infinite(),
            events: Vec::new(),
        }
    }

    /// Sets the node-local minimum gas prices used for fee checking.
    pub fn with_min_gas_prices(mut self, min_gas_prices: DecCoins) -> Self {
        self.min_gas_prices = min_gas_prices;
        self
    }

    /// Replaces the apply-path gas meter with a limited one.
    pub fn with_gas_limit(mut self, limit: u64) -> Self {
        self.gas = GasMeter::with_limit(limit);
        self
    }

    /// The chain identifier.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Height of the block being applied.
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Time of the block being applied, in unix seconds.
    pub fn block_time(&self) -> u64 {
        self.block_time
    }

    /// Node-local minimum gas prices.
    pub fn min_gas_prices(&self) -> &DecCoins {
        &self.min_gas_prices
    }

    /// The apply-path gas meter.
    pub fn gas_meter(&mut self) -> &mut GasMeter {
        &mut self.gas
    }

    /// Gas consumed on the apply path so far.
    pub fn gas_consumed(&self) -> u64 {
        self.gas.consumed()
    }

    /// Gets a value from the store.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.get(key)
    }

    /// Sets a value in the store.
    pub fn set(&mut self, key: &[u8], value: &[u8]) {
        self.store.set(key, value);
    }

    /// Deletes a value from the store.
    pub fn delete(&mut self, key: &[u8]) {
        self.store.delete(key);
    }

    /// Whether the store contains `key`.
    pub fn has(&self, key: &[u8]) -> bool {
        self.store.has(key)
    }

    /// All store entries under `prefix`, in ascending key order.
    pub fn prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.store.prefix(prefix)
    }

    /// Emits an event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drains the emitted events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_context_store_access() {
        let mut store = MemoryStore::new();
        let mut ctx = Context::new(&mut store, "test-chain", 4, 1_581_589_790);
        ctx.set(b"key", b"value");
        assert_eq!(ctx.get(b"key"), Some(b"value".to_vec()));
        assert_eq!(ctx.block_height(), 4);
        assert_eq!(ctx.chain_id(), "test-chain");
        drop(ctx);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_context_collects_events() {
        let mut store = MemoryStore::new();
        let mut ctx = Context::new(&mut store, "test-chain", 1, 0);
        ctx.emit(Event::new("request").attr("id", "1"));
        ctx.emit(Event::new("report"));
        assert_eq!(ctx.events().len(), 2);
        let events = ctx.take_events();
        assert_eq!(events[0].kind, "request");
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn test_context_gas_limit() {
        let mut store = MemoryStore::new();
        let mut ctx = Context::new(&mut store, "test-chain", 1, 0).with_gas_limit(10);
        assert!(ctx.gas_meter().consume(10, "ok").is_ok());
        assert!(ctx.gas_meter().consume(1, "over").is_err());
    }
}
