// rendbench-simulator/src/lib.rs

/*!
# rendbench Simulator

Deterministic stand-ins for the external engine, used for offline dry runs of
the benchmark harness and by tests across the workspace.

## Key Components:
- **Virtual Clock:** Simulated time with nanosecond precision, shared between clones.
- **Scripted Engine:** A `PhysicsEngine` that records every call, charges a fixed
  virtual cost per rendered frame and can be told to refuse connections or fail
  on demand.
*/

pub mod scripted_engine;
pub mod virtual_clock;

pub use scripted_engine::{CallJournal, EngineCall, ScriptedEngine};
pub use virtual_clock::VirtualClock;
