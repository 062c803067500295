//! Demand-driven pipeline.
//!
//! Nodes (sources, filters, mappers) live in a [`Pipeline`] arena and are
//! wired output-port to input-port. Nothing executes on wiring: a caller
//! asks for [`Pipeline::update`] on the node it needs, the request recurses
//! upstream, and each node re-executes only when something it depends on was
//! modified after its last execution.
//!
//! ```text
//!   PointCloudSource ──▶ WarpScalar ──▶ StickMapper
//!         ▲                   ▲              │ update()
//!         └── update() ◀──────┴──────────────┘
//! ```

mod algorithm;
mod error;
mod graph;
mod port;

pub use algorithm::{Algorithm, AsAny};
pub use error::{PipelineError, PortDirection};
pub use graph::Pipeline;
pub use port::{NodeHandle, NodeId, OutputPort};
