//! Adapters for the bridge orchestrator ports.

mod in_memory_relayer;

pub use in_memory_relayer::{
    calldata_mentions, InMemoryTxRelayer, Script, ScriptedResult, SentTransaction,
};
