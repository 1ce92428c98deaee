use std::{
    any::{TypeId, type_name},
    collections::{BTreeMap, VecDeque},
};

#[cfg(target_arch = "wasm32")]
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use flume::{Receiver, Sender};
use log::{debug, error, trace, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    Command, CommandFuture, CommandSnapshot, Compute, Dep, Error, Graph, State, StateSyncStatus,
    TaskHandle, TaskId, TopologyError, Updater,
    updater::{Envelope, UpdateMsg},
};

/// Upper bound on drain/recompute rounds inside one `sync_computes` call.
const MAX_SYNC_ROUNDS: usize = 8;

/// Owner of every registered state, compute and command.
///
/// Lives on the UI thread. Async work never touches it directly: commands
/// receive a [`CommandSnapshot`] and write back through an [`Updater`], and
/// the writes are applied on the next [`StateCtx::sync_computes`].
pub struct StateCtx {
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, Box<dyn Compute>>,
    status: BTreeMap<TypeId, StateSyncStatus>,
    commands: BTreeMap<TypeId, Box<dyn Command>>,

    graph: Graph<TypeId>,
    order: Option<Vec<TypeId>>,

    queue: VecDeque<TypeId>,
    generations: BTreeMap<TypeId, u64>,
    running: BTreeMap<TypeId, TaskHandle>,

    send: Sender<Envelope>,
    recv: Receiver<Envelope>,

    #[cfg(not(target_arch = "wasm32"))]
    tasks: tokio::task::JoinSet<()>,
    #[cfg(target_arch = "wasm32")]
    in_flight: Arc<AtomicUsize>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            status: BTreeMap::new(),
            commands: BTreeMap::new(),
            graph: Graph::new(),
            order: None,
            queue: VecDeque::new(),
            generations: BTreeMap::new(),
            running: BTreeMap::new(),
            send,
            recv,
            #[cfg(not(target_arch = "wasm32"))]
            tasks: tokio::task::JoinSet::new(),
            #[cfg(target_arch = "wasm32")]
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        let id = TypeId::of::<T>();
        trace!("Register state {}", type_name::<T>());
        self.graph.add_node(id);
        self.states.insert(id, Box::new(state));
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        let deps = compute.deps();
        trace!(
            "Register compute {} ({} deps)",
            type_name::<T>(),
            deps.states.len() + deps.computes.len()
        );

        self.graph.add_node(id);
        for dep in deps.states.iter().chain(deps.computes.iter()) {
            self.graph.route_to(*dep, id);
        }
        self.order = None;
        self.status.insert(id, StateSyncStatus::Init);
        self.computes.insert(id, Box::new(compute));
    }

    pub fn record_command<C: Command>(&mut self, command: C) {
        trace!("Register command {}", type_name::<C>());
        self.commands.insert(TypeId::of::<C>(), Box::new(command));
    }

    /// Checks that compute dependencies form a DAG.
    pub fn verify_deps(&self) -> Result<(), TopologyError<TypeId>> {
        self.graph.topology_order().map(|_| ())
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<T>())
            .ok_or_else(Error::state_not_found::<T>)
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable access. Computes depending on `T` are marked dirty.
    ///
    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.mark_dependents_dirty(id);
        self.states
            .get_mut(&id)
            .and_then(|s| s.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("{}", Error::state_not_found::<T>()))
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    pub fn try_compute<T: Compute>(&self) -> Result<&T, Error> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<T>())
            .ok_or_else(Error::compute_not_found::<T>)
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn compute<T: Compute>(&self) -> &T {
        self.try_compute::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// The current value of `T`, `None` when it is not registered.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.try_compute::<T>().ok()
    }

    /// Writes a compute directly from the UI thread, e.g. to flag a pending
    /// request before the command is flushed.
    pub fn update_compute<T: Compute>(&mut self, f: impl FnOnce(&mut T)) {
        let id = TypeId::of::<T>();
        match self
            .computes
            .get_mut(&id)
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
        {
            Some(compute) => f(compute),
            None => {
                warn!("{}", Error::compute_not_found::<T>());
                return;
            }
        }
        self.mark_dependents_dirty(id);
    }

    pub fn mark_dirty(&mut self, id: TypeId) {
        if let Some(status) = self.status.get_mut(&id) {
            *status = StateSyncStatus::Dirty;
        }
    }

    pub fn sync_status<T: Compute>(&self) -> StateSyncStatus {
        self.status
            .get(&TypeId::of::<T>())
            .copied()
            .unwrap_or_default()
    }

    fn mark_dependents_dirty(&mut self, id: TypeId) {
        for dependent in self.graph.dependents(id) {
            self.mark_dirty(dependent);
        }
    }

    /// Applies queued updates and recomputes dirty derived computes until
    /// nothing changes.
    pub fn sync_computes(&mut self) {
        self.reap_finished();

        for _ in 0..MAX_SYNC_ROUNDS {
            while let Ok(envelope) = self.recv.try_recv() {
                self.apply(envelope);
            }
            if !self.run_dirty_computes() && self.recv.is_empty() {
                return;
            }
        }

        warn!("sync_computes did not settle after {MAX_SYNC_ROUNDS} rounds");
    }

    fn apply(&mut self, envelope: Envelope) {
        let Envelope {
            target,
            origin,
            msg,
        } = envelope;

        if let Some(task) = origin
            && self.generations.get(&task.type_id()) != Some(&task.generation())
        {
            debug!(
                "Dropping update from superseded run (generation {})",
                task.generation()
            );
            return;
        }

        if let Some(state) = self.states.get_mut(&target) {
            match msg {
                UpdateMsg::Assign(value) => state.assign_box(value),
                UpdateMsg::Apply(f) => f(state.as_any_mut()),
            }
        } else if let Some(compute) = self.computes.get_mut(&target) {
            match msg {
                UpdateMsg::Assign(value) => compute.assign_box(value),
                UpdateMsg::Apply(f) => f(compute.as_any_mut()),
            }
        } else {
            warn!("Dropping update for unregistered type {target:?}");
            return;
        }

        self.mark_dependents_dirty(target);
    }

    fn compute_order(&mut self) -> Vec<TypeId> {
        if let Some(order) = &self.order {
            return order.clone();
        }

        let order: Vec<TypeId> = match self.graph.topology_order() {
            Ok(order) => order
                .into_iter()
                .filter(|id| self.computes.contains_key(id))
                .collect(),
            Err(err) => {
                error!("Falling back to registration order: {err}");
                self.computes.keys().copied().collect()
            }
        };
        self.order = Some(order.clone());
        order
    }

    fn run_dirty_computes(&mut self) -> bool {
        let mut ran = false;

        for id in self.compute_order() {
            let needs = self
                .status
                .get(&id)
                .is_some_and(|status| status.needs_compute());
            if !needs {
                continue;
            }

            if let Some(compute) = self.computes.get(&id) {
                if !compute.deps().is_empty() {
                    compute.compute(Dep::new(&self.states, &self.computes), self.updater());
                    ran = true;
                }
            }
            self.status.insert(id, StateSyncStatus::Clean);
        }

        ran
    }

    /// Queues `C` to run on the next [`StateCtx::flush_commands`].
    pub fn enqueue_command<C: Command>(&mut self) {
        let id = TypeId::of::<C>();
        if !self.commands.contains_key(&id) {
            warn!("{}", Error::command_not_found::<C>());
            return;
        }
        self.queue.push_back(id);
    }

    pub fn dispatch<C: Command>(&mut self) {
        self.enqueue_command::<C>();
        self.flush_commands();
    }

    /// Starts every queued command. A command that is still running from an
    /// earlier flush is cancelled and its later updates are dropped.
    pub fn flush_commands(&mut self) {
        while let Some(id) = self.queue.pop_front() {
            let Some(command) = self.commands.get(&id) else {
                continue;
            };

            let generation = {
                let counter = self.generations.entry(id).or_default();
                *counter += 1;
                *counter
            };
            let task = TaskId::new(id, generation);
            let token = CancellationToken::new();

            if let Some(previous) = self.running.insert(id, TaskHandle::new(task, token.clone())) {
                if !previous.is_cancelled() {
                    debug!(
                        "Cancelling generation {} in favour of {generation}",
                        previous.id().generation()
                    );
                }
                previous.cancel();
            }

            let snapshot = CommandSnapshot::capture(self.states.iter(), self.computes.iter());
            let future = command.run(snapshot, Updater::new(self.send.clone()).for_task(task), token);
            self.spawn(future);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&mut self, future: CommandFuture) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.tasks.spawn_on(future, &handle);
            }
            Err(err) => error!("Cannot start command without a Tokio runtime: {err}"),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&mut self, future: CommandFuture) {
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);
        wasm_bindgen_futures::spawn_local(async move {
            future.await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn reap_finished(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result
                && err.is_panic()
            {
                error!("Command task panicked: {err}");
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn reap_finished(&mut self) {}

    /// Number of command runs that have not finished yet.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn task_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_set_mut(&mut self) -> &mut tokio::task::JoinSet<()> {
        &mut self.tasks
    }

    /// Cancels every running command and waits for the tasks to stop.
    pub async fn shutdown(&mut self) {
        for handle in self.running.values() {
            handle.cancel();
        }
        self.queue.clear();
        #[cfg(not(target_arch = "wasm32"))]
        self.tasks.shutdown().await;
    }
}
