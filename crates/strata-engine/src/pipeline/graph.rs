use std::sync::Arc;

use crate::data::PolyData;
use crate::time::TimeStamp;

use super::{
    Algorithm, AsAny, NodeHandle, NodeId, OutputPort, PipelineError, PortDirection,
};

struct NodeEntry {
    algorithm: Box<dyn Algorithm>,
    inputs: Vec<Option<OutputPort>>,
    outputs: Vec<Option<Arc<PolyData>>>,

    /// Advanced after every successful execution.
    execute_time: TimeStamp,
    /// Advanced whenever an input port is rebound.
    wiring_time: TimeStamp,

    executions: u64,
    /// Set while the node is on the update stack.
    visiting: bool,
}

impl NodeEntry {
    fn is_stale(&self, input_time: TimeStamp) -> bool {
        !self.execute_time.is_set()
            || input_time > self.execute_time
            || self.algorithm.mtime() > self.execute_time
            || self.wiring_time > self.execute_time
    }
}

/// Arena of pipeline nodes and their connections.
///
/// Connections are node ids, never owning references, so the graph cannot
/// form ownership cycles; connection cycles are rejected when wiring.
#[derive(Default)]
pub struct Pipeline {
    nodes: Vec<NodeEntry>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node. Its ports start unbound and its outputs empty.
    pub fn add<T: Algorithm>(&mut self, algorithm: T) -> NodeHandle<T> {
        let id = NodeId(self.nodes.len() as u32);
        let inputs = vec![None; algorithm.input_ports()];
        let outputs = vec![None; algorithm.output_ports()];
        self.nodes.push(NodeEntry {
            algorithm: Box::new(algorithm),
            inputs,
            outputs,
            execute_time: TimeStamp::new(),
            wiring_time: TimeStamp::new(),
            executions: 0,
            visiting: false,
        });
        NodeHandle::new(id)
    }

    // ── typed access ───────────────────────────────────────────────────────

    pub fn get<T: Algorithm>(&self, handle: NodeHandle<T>) -> Option<&T> {
        let entry = self.nodes.get(handle.id().index())?;
        <dyn Algorithm as AsAny>::as_any(entry.algorithm.as_ref()).downcast_ref::<T>()
    }

    /// Mutable access for parameter changes.
    ///
    /// Setters touch the node's own stamp; the next `update` picks it up.
    pub fn get_mut<T: Algorithm>(&mut self, handle: NodeHandle<T>) -> Option<&mut T> {
        let entry = self.nodes.get_mut(handle.id().index())?;
        <dyn Algorithm as AsAny>::as_any_mut(entry.algorithm.as_mut()).downcast_mut::<T>()
    }

    pub fn algorithm(&self, node: impl Into<NodeId>) -> Option<&dyn Algorithm> {
        self.nodes.get(node.into().index()).map(|e| e.algorithm.as_ref())
    }

    // ── wiring ─────────────────────────────────────────────────────────────

    /// Returns a reference to one of `node`'s output ports. Does not execute.
    pub fn output_port(
        &self,
        node: impl Into<NodeId>,
        index: usize,
    ) -> Result<OutputPort, PipelineError> {
        let node = node.into();
        let entry = self.entry(node)?;
        if index >= entry.outputs.len() {
            return Err(PipelineError::InvalidPort {
                node,
                direction: PortDirection::Output,
                index,
                available: entry.outputs.len(),
            });
        }
        Ok(OutputPort { node, index })
    }

    /// Binds `consumer`'s input port 0 to `port`.
    pub fn set_input_connection(
        &mut self,
        consumer: impl Into<NodeId>,
        port: OutputPort,
    ) -> Result<(), PipelineError> {
        self.set_input_connection_at(consumer, 0, port)
    }

    /// Binds one of `consumer`'s input ports to `port`.
    ///
    /// Fails on an invalid port on either side, or when the producer already
    /// depends on the consumer.
    pub fn set_input_connection_at(
        &mut self,
        consumer: impl Into<NodeId>,
        input: usize,
        port: OutputPort,
    ) -> Result<(), PipelineError> {
        let consumer = consumer.into();
        let port = self.output_port(port.node, port.index)?;

        let available = self.entry(consumer)?.inputs.len();
        if input >= available {
            return Err(PipelineError::InvalidPort {
                node: consumer,
                direction: PortDirection::Input,
                index: input,
                available,
            });
        }

        if self.depends_on(port.node, consumer) {
            return Err(PipelineError::Cycle { consumer, producer: port.node });
        }

        let entry = &mut self.nodes[consumer.index()];
        if entry.inputs[input] != Some(port) {
            entry.inputs[input] = Some(port);
            entry.wiring_time.modified();
        }
        Ok(())
    }

    /// Unbinds one input port. The node fails to update until rebound.
    pub fn remove_input_connection(
        &mut self,
        consumer: impl Into<NodeId>,
        input: usize,
    ) -> Result<(), PipelineError> {
        let consumer = consumer.into();
        let entry = self.entry_mut(consumer)?;
        let available = entry.inputs.len();
        let Some(slot) = entry.inputs.get_mut(input) else {
            return Err(PipelineError::InvalidPort {
                node: consumer,
                direction: PortDirection::Input,
                index: input,
                available,
            });
        };
        if slot.take().is_some() {
            entry.wiring_time.modified();
        }
        Ok(())
    }

    /// True when `target` is `node` or lies upstream of it.
    fn depends_on(&self, node: NodeId, target: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            let Some(seen) = visited.get_mut(current.index()) else { continue };
            if std::mem::replace(seen, true) {
                continue;
            }
            stack.extend(self.nodes[current.index()].inputs.iter().flatten().map(|p| p.node));
        }
        false
    }

    // ── execution ──────────────────────────────────────────────────────────

    /// Brings `node` and everything upstream of it up to date.
    ///
    /// Each node executes at most once per change: calling `update` again
    /// without an intervening modification does nothing.
    pub fn update(&mut self, node: impl Into<NodeId>) -> Result<(), PipelineError> {
        let node = node.into();
        let entry = self.entry_mut(node)?;
        if entry.visiting {
            // Unreachable through the public wiring API, which rejects cycles.
            return Err(PipelineError::Cycle { consumer: node, producer: node });
        }
        entry.visiting = true;
        let result = self.update_visiting(node);
        self.nodes[node.index()].visiting = false;
        result
    }

    fn update_visiting(&mut self, node: NodeId) -> Result<(), PipelineError> {
        let bindings = self.nodes[node.index()].inputs.clone();

        let mut inputs = Vec::with_capacity(bindings.len());
        for (port, binding) in bindings.into_iter().enumerate() {
            let Some(producer) = binding else {
                return Err(PipelineError::MissingInput {
                    node,
                    class: self.nodes[node.index()].algorithm.class_name(),
                    port,
                });
            };
            self.update(producer.node)?;
            let data = self.nodes[producer.node.index()]
                .outputs
                .get(producer.index)
                .cloned()
                .flatten()
                .ok_or(PipelineError::InvalidPort {
                    node: producer.node,
                    direction: PortDirection::Output,
                    index: producer.index,
                    available: self.nodes[producer.node.index()].outputs.len(),
                })?;
            inputs.push(data);
        }

        let input_time = inputs.iter().map(|d| d.mtime()).max().unwrap_or_default();
        let entry = &mut self.nodes[node.index()];
        if !entry.is_stale(input_time) {
            return Ok(());
        }

        let class = entry.algorithm.class_name();
        log::debug!("executing {class} ({node})");

        let outputs = match entry.algorithm.request_data(&inputs) {
            Ok(outputs) => outputs,
            Err(err) => {
                log::error!("{class} ({node}) failed: {err}");
                return Err(err);
            }
        };
        if outputs.len() != entry.outputs.len() {
            let err = PipelineError::OutputCount {
                class,
                expected: entry.outputs.len(),
                found: outputs.len(),
            };
            log::error!("{class} ({node}) failed: {err}");
            return Err(err);
        }

        for (slot, mut data) in entry.outputs.iter_mut().zip(outputs) {
            data.touch();
            *slot = Some(Arc::new(data));
        }
        entry.execute_time.modified();
        entry.executions += 1;
        Ok(())
    }

    // ── inspection ─────────────────────────────────────────────────────────

    /// Latest snapshot on an output port; `None` until the node executed.
    pub fn output_data(&self, node: impl Into<NodeId>, index: usize) -> Option<&Arc<PolyData>> {
        self.nodes.get(node.into().index())?.outputs.get(index)?.as_ref()
    }

    /// Number of successful executions of `node`.
    pub fn execution_count(&self, node: impl Into<NodeId>) -> u64 {
        self.nodes.get(node.into().index()).map_or(0, |e| e.executions)
    }

    /// Stamp of the last successful execution (unset if never executed).
    pub fn execute_time(&self, node: impl Into<NodeId>) -> TimeStamp {
        self.nodes.get(node.into().index()).map_or(TimeStamp::new(), |e| e.execute_time)
    }

    fn entry(&self, node: NodeId) -> Result<&NodeEntry, PipelineError> {
        self.nodes.get(node.index()).ok_or(PipelineError::UnknownNode { node })
    }

    fn entry_mut(&mut self, node: NodeId) -> Result<&mut NodeEntry, PipelineError> {
        self.nodes.get_mut(node.index()).ok_or(PipelineError::UnknownNode { node })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataArray;
    use crate::time::assign;

    /// Source emitting `count` points along x.
    struct Counter {
        count: usize,
        mtime: TimeStamp,
    }

    impl Counter {
        fn new(count: usize) -> Self {
            Self { count, mtime: TimeStamp::modified_now() }
        }

        fn set_count(&mut self, count: usize) {
            assign(&mut self.count, count, &mut self.mtime);
        }
    }

    impl Algorithm for Counter {
        fn class_name(&self) -> &'static str {
            "Counter"
        }
        fn input_ports(&self) -> usize {
            0
        }
        fn mtime(&self) -> TimeStamp {
            self.mtime
        }
        fn request_data(&mut self, _: &[Arc<PolyData>]) -> Result<Vec<PolyData>, PipelineError> {
            let pts: Vec<[f32; 3]> = (0..self.count).map(|i| [i as f32, 0.0, 0.0]).collect();
            Ok(vec![PolyData::from_points(&pts)])
        }
    }

    /// Filter copying its input and tagging it with a scalar array.
    struct Tag {
        fail: bool,
        mtime: TimeStamp,
    }

    impl Tag {
        fn new() -> Self {
            Self { fail: false, mtime: TimeStamp::new() }
        }
    }

    impl Algorithm for Tag {
        fn class_name(&self) -> &'static str {
            "Tag"
        }
        fn mtime(&self) -> TimeStamp {
            self.mtime
        }
        fn request_data(
            &mut self,
            inputs: &[Arc<PolyData>],
        ) -> Result<Vec<PolyData>, PipelineError> {
            if self.fail {
                return Err(PipelineError::MissingArray { class: "Tag", name: "x".into() });
            }
            let input = &inputs[0];
            let mut out = PolyData::with_points(Arc::clone(input.points()))?;
            out.add_array(DataArray::from_scalars("tag", vec![1.0; input.number_of_points()]))?;
            Ok(vec![out])
        }
    }

    /// Two-input filter concatenating point sets.
    struct Append {
        mtime: TimeStamp,
    }

    impl Algorithm for Append {
        fn class_name(&self) -> &'static str {
            "Append"
        }
        fn input_ports(&self) -> usize {
            2
        }
        fn mtime(&self) -> TimeStamp {
            self.mtime
        }
        fn request_data(
            &mut self,
            inputs: &[Arc<PolyData>],
        ) -> Result<Vec<PolyData>, PipelineError> {
            let pts: Vec<[f32; 3]> = inputs
                .iter()
                .flat_map(|pd| (0..pd.number_of_points()).map(|i| pd.point(i)))
                .collect();
            Ok(vec![PolyData::from_points(&pts)])
        }
    }

    /// Sink with no outputs.
    struct Sink {
        seen: usize,
        mtime: TimeStamp,
    }

    impl Algorithm for Sink {
        fn class_name(&self) -> &'static str {
            "Sink"
        }
        fn output_ports(&self) -> usize {
            0
        }
        fn mtime(&self) -> TimeStamp {
            self.mtime
        }
        fn request_data(
            &mut self,
            inputs: &[Arc<PolyData>],
        ) -> Result<Vec<PolyData>, PipelineError> {
            self.seen = inputs[0].number_of_points();
            Ok(Vec::new())
        }
    }

    fn sink() -> Sink {
        Sink { seen: 0, mtime: TimeStamp::new() }
    }

    fn connect<A, B>(p: &mut Pipeline, from: NodeHandle<A>, to: NodeHandle<B>) {
        let port = p.output_port(from, 0).unwrap();
        p.set_input_connection(to, port).unwrap();
    }

    #[test]
    fn update_twice_executes_once() {
        let mut p = Pipeline::new();
        let src = p.add(Counter::new(4));
        let tag = p.add(Tag::new());
        connect(&mut p, src, tag);

        p.update(tag).unwrap();
        p.update(tag).unwrap();

        assert_eq!(p.execution_count(src), 1);
        assert_eq!(p.execution_count(tag), 1);
        assert_eq!(p.output_data(tag, 0).unwrap().number_of_points(), 4);
    }

    #[test]
    fn wiring_does_not_execute() {
        let mut p = Pipeline::new();
        let src = p.add(Counter::new(1));
        let tag = p.add(Tag::new());
        connect(&mut p, src, tag);
        assert_eq!(p.execution_count(src), 0);
        assert!(p.output_data(src, 0).is_none());
    }

    #[test]
    fn source_change_propagates_three_hops_but_not_to_siblings() {
        let mut p = Pipeline::new();
        let src = p.add(Counter::new(2));
        let a = p.add(Tag::new());
        let b = p.add(Tag::new());
        let mapper = p.add(sink());
        connect(&mut p, src, a);
        connect(&mut p, a, b);
        connect(&mut p, b, mapper);

        // Unrelated branch hanging off the same source.
        let sibling = p.add(Tag::new());
        connect(&mut p, src, sibling);
        p.update(sibling).unwrap();

        p.update(mapper).unwrap();
        let before: Vec<u64> = [src.id(), a.id(), b.id(), mapper.id(), sibling.id()]
            .iter()
            .map(|&n| p.execution_count(n))
            .collect();

        p.get_mut(src).unwrap().set_count(5);
        p.update(mapper).unwrap();

        assert_eq!(p.execution_count(src), before[0] + 1);
        assert_eq!(p.execution_count(a), before[1] + 1);
        assert_eq!(p.execution_count(b), before[2] + 1);
        assert_eq!(p.execution_count(mapper), before[3] + 1);
        assert_eq!(p.execution_count(sibling), before[4]);
        assert_eq!(p.get(mapper).unwrap().seen, 5);
    }

    #[test]
    fn unchanged_setter_does_not_recompute() {
        let mut p = Pipeline::new();
        let src = p.add(Counter::new(3));
        let tag = p.add(Tag::new());
        connect(&mut p, src, tag);
        p.update(tag).unwrap();

        let stamp = p.get(src).unwrap().mtime();
        p.get_mut(src).unwrap().set_count(3);
        assert_eq!(p.get(src).unwrap().mtime(), stamp);

        p.update(tag).unwrap();
        assert_eq!(p.execution_count(src), 1);
        assert_eq!(p.execution_count(tag), 1);
    }

    #[test]
    fn invalid_ports_are_rejected() {
        let mut p = Pipeline::new();
        let src = p.add(Counter::new(1));
        let tag = p.add(Tag::new());

        assert!(matches!(
            p.output_port(src, 1),
            Err(PipelineError::InvalidPort { direction: PortDirection::Output, .. })
        ));

        let port = p.output_port(src, 0).unwrap();
        assert!(matches!(
            p.set_input_connection_at(tag, 3, port),
            Err(PipelineError::InvalidPort { direction: PortDirection::Input, index: 3, .. })
        ));
        assert!(matches!(
            p.set_input_connection(src, port),
            Err(PipelineError::InvalidPort { .. })
        ));

        let bogus = OutputPort { node: NodeId(42), index: 0 };
        assert!(matches!(
            p.set_input_connection(tag, bogus),
            Err(PipelineError::UnknownNode { .. })
        ));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut p = Pipeline::new();
        let a = p.add(Tag::new());
        let b = p.add(Tag::new());
        connect(&mut p, a, b);

        let port = p.output_port(b, 0).unwrap();
        assert!(matches!(
            p.set_input_connection(a, port),
            Err(PipelineError::Cycle { .. })
        ));

        let own = p.output_port(a, 0).unwrap();
        assert!(matches!(p.set_input_connection(a, own), Err(PipelineError::Cycle { .. })));
    }

    #[test]
    fn unconnected_input_fails() {
        let mut p = Pipeline::new();
        let tag = p.add(Tag::new());
        assert!(matches!(p.update(tag), Err(PipelineError::MissingInput { port: 0, .. })));
    }

    #[test]
    fn failing_node_keeps_downstream_stale() {
        let mut p = Pipeline::new();
        let src = p.add(Counter::new(2));
        let tag = p.add(Tag::new());
        let out = p.add(sink());
        connect(&mut p, src, tag);
        connect(&mut p, tag, out);
        p.update(out).unwrap();
        let stamp = p.execute_time(tag);

        p.get_mut(tag).unwrap().fail = true;
        p.get_mut(src).unwrap().set_count(7);
        assert!(p.update(out).is_err());
        assert_eq!(p.execute_time(tag), stamp);
        assert_eq!(p.execution_count(out), 1);

        p.get_mut(tag).unwrap().fail = false;
        p.update(out).unwrap();
        assert_eq!(p.execution_count(out), 2);
        assert_eq!(p.get(out).unwrap().seen, 7);
    }

    #[test]
    fn rewiring_marks_consumer_stale() {
        let mut p = Pipeline::new();
        let small = p.add(Counter::new(1));
        let large = p.add(Counter::new(9));
        let out = p.add(sink());
        connect(&mut p, small, out);
        p.update(out).unwrap();
        p.update(large).unwrap();

        connect(&mut p, large, out);
        p.update(out).unwrap();
        assert_eq!(p.get(out).unwrap().seen, 9);
        assert_eq!(p.execution_count(out), 2);
    }

    #[test]
    fn multi_input_node_waits_for_all_inputs() {
        let mut p = Pipeline::new();
        let a = p.add(Counter::new(2));
        let b = p.add(Counter::new(3));
        let join = p.add(Append { mtime: TimeStamp::new() });

        connect(&mut p, a, join);
        assert!(matches!(p.update(join), Err(PipelineError::MissingInput { port: 1, .. })));

        let port = p.output_port(b, 0).unwrap();
        p.set_input_connection_at(join, 1, port).unwrap();
        p.update(join).unwrap();
        assert_eq!(p.output_data(join, 0).unwrap().number_of_points(), 5);

        p.remove_input_connection(join, 1).unwrap();
        assert!(p.update(join).is_err());
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let mut p = Pipeline::new();
        let src = p.add(Counter::new(0));
        let tag = p.add(Tag::new());
        connect(&mut p, src, tag);
        p.update(tag).unwrap();
        let out = p.output_data(tag, 0).unwrap();
        assert_eq!(out.number_of_points(), 0);
        assert!(out.point_data().has_array("tag"));
    }
}
