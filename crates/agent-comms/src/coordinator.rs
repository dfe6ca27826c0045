//! Agency: runs a fixed set of agents on demand-spawned worker threads
//!
//! Each agent gets a [`Mailbox`] and a [`SendMessageTool`]. Delivering mail
//! to an agent that has no worker starts one; the worker drains the
//! mailbox into history, runs the agent's loop, and exits only once the
//! loop has finished with an empty mailbox.
//!
//! Two locks matter. The worker table lock guards the set of active
//! workers and is the only place a worker is started or retired. Each
//! agent's own lock is held by its worker for the whole active period, so
//! a worker started right after another one retired waits for its
//! predecessor to finish before touching the agent.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use agent_core::{AgencyConfig, AgentError};
use agent_llm::Message;
use agent_runtime::{Agent, AgentInfo, AgentRuntimeError};
use parking_lot::{Condvar, Mutex};

use crate::{
    hooks::{AgencyHooks, NoAgencyHooks, SeatHooks},
    AgentMessage, AgentRegistry, CommsError, Mailbox, Result, SendMessageTool,
};

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// One agent together with its mailbox
struct Seat {
    info: AgentInfo,
    agent: Mutex<Agent>,
    mailbox: Arc<Mailbox>,
}

struct WorkerTable {
    active: HashMap<String, JoinHandle<()>>, // agent ID -> running worker
    finished: Vec<JoinHandle<()>>,
    accepting: bool,
}

/// Outcome of asking for an agent's worker to be running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Spawned,
    AlreadyRunning,
    Suspended,
}

/// State shared by the agency, its handles, and its workers
pub(crate) struct AgencyInner {
    seats: HashMap<String, Arc<Seat>>, // agent ID -> seat
    registry: AgentRegistry,
    workers: Mutex<WorkerTable>,
    idle: Condvar,
    hooks: Arc<dyn AgencyHooks>,
}

impl AgencyInner {
    fn seat(&self, target: &str) -> Result<&Arc<Seat>> {
        let info = self.registry.resolve(target)?;
        self.seats
            .get(&info.id)
            .ok_or_else(|| CommsError::unknown_recipient(target))
    }

    fn is_accepting(&self) -> bool {
        self.workers.lock().accepting
    }

    /// Queue a message for `target` and make sure it has a worker
    pub(crate) fn deliver(
        self: &Arc<Self>,
        from: Option<&AgentInfo>,
        target: &str,
        body: String,
    ) -> Result<AgentInfo> {
        let seat = self.seat(target)?;
        if !self.is_accepting() {
            return Err(CommsError::ShuttingDown);
        }

        let message = match from {
            Some(sender) => AgentMessage::new(sender.clone(), seat.info.id.clone(), body),
            None => AgentMessage::external(seat.info.id.clone(), body),
        };
        seat.mailbox.send(message);

        let wake = self.wake(seat)?;
        if wake == Wake::Suspended {
            return Err(CommsError::ShuttingDown);
        }
        tracing::debug!(agent = %seat.info, ?wake, "Delivered message");
        Ok(seat.info.clone())
    }

    /// Start a worker for the seat unless one is already active
    ///
    /// The check and the insert happen under one hold of the table lock,
    /// so racing callers start at most one worker.
    fn wake(self: &Arc<Self>, seat: &Arc<Seat>) -> Result<Wake> {
        let mut table = self.workers.lock();
        if !table.accepting {
            return Ok(Wake::Suspended);
        }
        if table.active.contains_key(&seat.info.id) {
            return Ok(Wake::AlreadyRunning);
        }
        Self::reap_finished(&mut table);

        let inner = Arc::clone(self);
        let worker_seat = Arc::clone(seat);
        let handle = std::thread::Builder::new()
            .name(format!("agent-{}", seat.info.name))
            .spawn(move || run_worker(inner, worker_seat))?;

        table.active.insert(seat.info.id.clone(), handle);
        tracing::info!(agent = %seat.info.name, id = %seat.info.id, "Waking up");
        Ok(Wake::Spawned)
    }

    /// Retire the seat's worker if its mailbox is empty
    ///
    /// Holding the table lock across the emptiness check means a sender
    /// either lands its mail before the check, or finds the slot free
    /// afterwards and starts a fresh worker.
    fn retire_if_idle(&self, seat: &Seat) -> bool {
        let mut table = self.workers.lock();
        if !seat.mailbox.is_empty() {
            return false;
        }
        Self::retire_locked(&mut table, &seat.info.id);
        drop(table);
        self.idle.notify_all();
        true
    }

    fn retire(&self, id: &str) {
        let mut table = self.workers.lock();
        Self::retire_locked(&mut table, id);
        drop(table);
        self.idle.notify_all();
    }

    fn retire_locked(table: &mut WorkerTable, id: &str) {
        if let Some(handle) = table.active.remove(id) {
            table.finished.push(handle);
        }
    }

    /// Join retired workers whose threads have already exited
    fn reap_finished(table: &mut WorkerTable) {
        let (done, running): (Vec<_>, Vec<_>) = std::mem::take(&mut table.finished)
            .into_iter()
            .partition(|handle| handle.is_finished());
        table.finished = running;

        for handle in done {
            if handle.join().is_err() {
                tracing::error!("Agent worker panicked");
            }
        }
    }

    fn wait_for_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut table = self.workers.lock();
        while !table.active.is_empty() {
            if self.idle.wait_until(&mut table, deadline).timed_out() {
                break;
            }
        }
        let idle = table.active.is_empty();
        let finished = std::mem::take(&mut table.finished);
        drop(table);

        for handle in finished {
            if handle.join().is_err() {
                tracing::error!("Agent worker panicked");
            }
        }
        idle
    }

    fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.workers.lock().accepting = false;

        if self.wait_for_idle(timeout) {
            tracing::debug!("All agent workers stopped");
            return Ok(());
        }

        let table = self.workers.lock();
        let mut stuck: Vec<String> = table
            .active
            .keys()
            .filter_map(|id| self.registry.lookup(id))
            .map(|info| info.name)
            .collect();
        stuck.sort();
        Err(CommsError::ShutdownTimeout(stuck))
    }
}

/// Releases the worker slot and reports the stop, even if the run panics
struct WorkerExit<'a> {
    inner: &'a AgencyInner,
    seat: &'a Seat,
    retired: bool,
}

impl Drop for WorkerExit<'_> {
    fn drop(&mut self) {
        if !self.retired {
            self.inner.retire(&self.seat.info.id);
        }
        tracing::info!(agent = %self.seat.info.name, id = %self.seat.info.id, "Going to sleep");
        self.inner
            .hooks
            .on_agent_status_change(&self.seat.info, false);
    }
}

fn run_worker(inner: Arc<AgencyInner>, seat: Arc<Seat>) {
    let mut agent = seat.agent.lock();
    inner.hooks.on_agent_status_change(&seat.info, true);

    let mut exit = WorkerExit {
        inner: &inner,
        seat: &seat,
        retired: false,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let error = AgentRuntimeError::from(AgentError::from(e));
            tracing::error!(agent = %seat.info.name, error = %error, "Failed to start agent runtime");
            inner.hooks.on_agent_error(&seat.info, &error);
            return;
        }
    };

    let hooks = SeatHooks {
        hooks: inner.hooks.as_ref(),
        agent: &seat.info,
    };

    // Every run drains the mailbox before its first model call, so a
    // failed run is retried only when new mail came in meanwhile.
    loop {
        if let Err(e) = runtime.block_on(agent.run_with_inbox(&hooks, seat.mailbox.as_ref())) {
            inner.hooks.on_agent_error(&seat.info, &e);
        }

        if inner.retire_if_idle(&seat) {
            exit.retired = true;
            break;
        }
        tracing::debug!(agent = %seat.info.name, "Mail arrived while finishing, running again");
    }

    drop(exit);
    drop(agent);
}

/// Cheap, non-owning handle to an [`Agency`]
///
/// Safe to keep inside hooks and tools; every call fails with
/// [`CommsError::ShuttingDown`] once the agency is gone.
#[derive(Clone)]
pub struct AgencyHandle {
    inner: Weak<AgencyInner>,
}

impl AgencyHandle {
    fn upgrade(&self) -> Result<Arc<AgencyInner>> {
        self.inner.upgrade().ok_or(CommsError::ShuttingDown)
    }

    /// Send `content` from one agent to another
    pub fn send(&self, from: &str, target: &str, content: impl Into<String>) -> Result<AgentInfo> {
        let inner = self.upgrade()?;
        let sender = inner.seat(from)?.info.clone();
        inner.deliver(Some(&sender), target, content.into())
    }

    /// Start `target`, optionally with a message from outside the agency
    pub fn run(&self, target: &str, initial_message: Option<&str>) -> Result<()> {
        let inner = self.upgrade()?;
        start(&inner, target, initial_message)
    }
}

fn start(inner: &Arc<AgencyInner>, target: &str, initial_message: Option<&str>) -> Result<()> {
    match initial_message {
        Some(body) => inner.deliver(None, target, body.to_string()).map(|_| ()),
        None => {
            let seat = inner.seat(target)?;
            match inner.wake(seat)? {
                Wake::Suspended => Err(CommsError::ShuttingDown),
                _ => Ok(()),
            }
        }
    }
}

/// A set of agents that can message and wake one another
///
/// Dropping the agency stops accepting new work and waits, up to the
/// shutdown timeout, for running workers to finish.
///
/// # Example
///
/// ```no_run
/// use agent_comms::Agency;
/// use agent_llm::ScriptedProvider;
/// use agent_runtime::Agent;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let alice = Agent::builder()
///     .name("Alice")
///     .provider(ScriptedProvider::repeating("Hi!"))
///     .build()?;
///
/// let agency = Agency::new(vec![alice])?;
/// agency.run("Alice", Some("Hello"))?;
/// agency.wait_for_idle(Duration::from_secs(10));
/// # Ok(())
/// # }
/// ```
pub struct Agency {
    inner: Arc<AgencyInner>,
    shutdown_timeout: Duration,
}

impl Agency {
    /// Create an agency with default hooks
    pub fn new(agents: Vec<Agent>) -> Result<Self> {
        Self::builder().agents(agents).build()
    }

    /// Create a new agency builder
    pub fn builder() -> AgencyBuilder {
        AgencyBuilder::new()
    }

    /// Start an agent, optionally sending it a message first
    ///
    /// Returns without waiting for the agent. Does nothing beyond queueing
    /// the message if the agent is already running.
    pub fn run(&self, target: &str, initial_message: Option<&str>) -> Result<()> {
        start(&self.inner, target, initial_message)
    }

    /// Send a message from one agent to another, as `SendMessage` would
    pub fn send(&self, from: &str, target: &str, content: impl Into<String>) -> Result<AgentInfo> {
        self.handle().send(from, target, content)
    }

    /// Block until no worker is active or the timeout elapses
    ///
    /// Returns whether the agency went idle. Must not be called from a
    /// hook or tool running inside the agency.
    pub fn wait_for_idle(&self, timeout: Duration) -> bool {
        self.inner.wait_for_idle(timeout)
    }

    /// Copy of an agent's history
    ///
    /// Waits for the agent's worker, if any, to finish first.
    pub fn history(&self, target: &str) -> Result<Vec<Message>> {
        let seat = self.inner.seat(target)?;
        let agent = seat.agent.lock();
        Ok(agent.history().snapshot())
    }

    /// Whether the agent currently has a worker
    pub fn is_running(&self, target: &str) -> Result<bool> {
        let seat = self.inner.seat(target)?;
        Ok(self.inner.workers.lock().active.contains_key(&seat.info.id))
    }

    /// Agents that currently have a worker, ordered by name
    pub fn active_workers(&self) -> Vec<AgentInfo> {
        let table = self.inner.workers.lock();
        let mut active: Vec<AgentInfo> = table
            .active
            .keys()
            .filter_map(|id| self.inner.registry.lookup(id))
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        active
    }

    /// Every agent in the agency, ordered by name
    pub fn roster(&self) -> Vec<AgentInfo> {
        self.inner.registry.list_all()
    }

    /// Non-owning handle for use inside hooks and tools
    pub fn handle(&self) -> AgencyHandle {
        AgencyHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Stop accepting work and wait for running workers
    ///
    /// Mail sent after this point is rejected. Idempotent.
    pub fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.inner.shutdown(timeout)
    }

    /// Run `f` with the agency, then shut it down
    pub fn scope<R>(self, f: impl FnOnce(&Agency) -> R) -> Result<R> {
        let result = f(&self);
        self.shutdown(self.shutdown_timeout)?;
        Ok(result)
    }
}

impl Drop for Agency {
    fn drop(&mut self) {
        if let Err(e) = self.inner.shutdown(self.shutdown_timeout) {
            tracing::warn!("Agency dropped with running workers: {}", e);
        }
    }
}

/// Builder for constructing an Agency
pub struct AgencyBuilder {
    agents: Vec<Agent>,
    hooks: Arc<dyn AgencyHooks>,
    shutdown_timeout: Duration,
}

impl AgencyBuilder {
    /// Create a new agency builder
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            hooks: Arc::new(NoAgencyHooks),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = Agent>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Set the agency hooks
    pub fn hooks<H: AgencyHooks + 'static>(mut self, hooks: H) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// How long shutdown waits for running workers
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Apply settings from configuration
    pub fn config(self, config: &AgencyConfig) -> Self {
        self.shutdown_timeout(config.agency.shutdown_timeout())
    }

    /// Build the agency and give every agent its `SendMessage` tool
    ///
    /// An agent whose id is already taken gets a fresh one. Duplicate
    /// names are an error.
    pub fn build(mut self) -> Result<Agency> {
        let registry = AgentRegistry::new();
        for agent in &mut self.agents {
            while registry.lookup(agent.id()).is_some() {
                tracing::debug!(agent = %agent.name(), id = %agent.id(), "Agent id taken, picking another");
                agent.regenerate_id();
            }
            registry.register(agent.info().clone())?;
        }

        let seats = self
            .agents
            .into_iter()
            .map(|agent| {
                let info = agent.info().clone();
                let seat = Seat {
                    mailbox: Arc::new(Mailbox::new(info.id.clone())),
                    agent: Mutex::new(agent),
                    info: info.clone(),
                };
                (info.id, Arc::new(seat))
            })
            .collect();

        let inner = Arc::new(AgencyInner {
            seats,
            registry,
            workers: Mutex::new(WorkerTable {
                active: HashMap::new(),
                finished: Vec::new(),
                accepting: true,
            }),
            idle: Condvar::new(),
            hooks: self.hooks,
        });

        for seat in inner.seats.values() {
            let peers = inner.registry.peers_of(&seat.info.id);
            let tool = SendMessageTool::new(Arc::downgrade(&inner), seat.info.clone(), &peers);
            seat.agent.lock().add_tool(Arc::new(tool))?;
        }

        tracing::info!(agents = inner.seats.len(), "Agency ready");

        Ok(Agency {
            inner,
            shutdown_timeout: self.shutdown_timeout,
        })
    }
}

impl Default for AgencyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::ScriptedProvider;

    fn agent(name: &str) -> Agent {
        Agent::builder()
            .name(name)
            .description(format!("{} the tester", name))
            .provider(ScriptedProvider::repeating("ok"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_every_agent_gets_send_message() {
        let agency = Agency::new(vec![agent("Alice"), agent("Bob")]).unwrap();
        for seat in agency.inner.seats.values() {
            let agent = seat.agent.lock();
            let tool = agent.tools().get_tool("SendMessage").unwrap();
            let description = tool.description();
            assert!(description.starts_with("Send a message to another agent. Available agents:\n"));
            assert!(!description.contains(&format!("* {}", seat.info)));
        }
    }

    #[test]
    fn test_roster_lists_peers_only() {
        let agency = Agency::new(vec![agent("Alice"), agent("Bob")]).unwrap();
        let bob = agency.inner.seat("Bob").unwrap();
        let alice_info = agency.inner.seat("Alice").unwrap().info.clone();
        let agent = bob.agent.lock();
        let description = agent.tools().get_tool("SendMessage").unwrap().description().to_string();
        assert!(description.ends_with(&format!("* {} - Alice the tester", alice_info)));
    }

    #[test]
    fn test_colliding_ids_are_reassigned() {
        let twin = |name: &str| {
            Agent::builder()
                .id("abcdef")
                .name(name)
                .provider(ScriptedProvider::repeating("ok"))
                .build()
                .unwrap()
        };
        let agency = Agency::new(vec![twin("Alice"), twin("Bob")]).unwrap();

        let roster = agency.roster();
        assert_eq!(roster.len(), 2);
        assert_ne!(roster[0].id, roster[1].id);
        assert!(roster.iter().any(|info| info.id == "abcdef"));
        assert_eq!(agency.inner.seats.len(), 2);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Agency::new(vec![agent("Alice"), agent("Alice")]);
        assert!(matches!(result, Err(CommsError::DuplicateAgent(_))));
    }

    #[test]
    fn test_unknown_target() {
        let agency = Agency::new(vec![agent("Alice")]).unwrap();
        assert!(matches!(
            agency.run("Nobody", Some("hi")),
            Err(CommsError::UnknownRecipient(_))
        ));
    }

    #[test]
    fn test_run_after_shutdown_is_rejected() {
        let agency = Agency::new(vec![agent("Alice")]).unwrap();
        agency.shutdown(Duration::from_secs(1)).unwrap();
        assert!(matches!(agency.run("Alice", Some("hi")), Err(CommsError::ShuttingDown)));
        assert!(matches!(agency.run("Alice", None), Err(CommsError::ShuttingDown)));
    }

    #[test]
    fn test_exited_workers_are_reaped_on_next_spawn() {
        let agency = Agency::new(vec![agent("Alice")]).unwrap();

        for turn in 0..20 {
            agency.run("Alice", Some(&format!("turn {}", turn))).unwrap();
            // the worker releases the agent last, just before its thread returns
            let deadline = Instant::now() + Duration::from_secs(10);
            while agency.is_running("Alice").unwrap() {
                assert!(Instant::now() < deadline, "worker did not retire");
                std::thread::sleep(Duration::from_millis(1));
            }
            agency.history("Alice").unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(agency.inner.workers.lock().finished.len() <= 2);
        assert!(agency.wait_for_idle(Duration::from_secs(10)));
        assert!(agency.inner.workers.lock().finished.is_empty());
    }

    #[test]
    fn test_delivery_fails_once_spawning_is_suspended() {
        let agency = Agency::new(vec![agent("Alice")]).unwrap();
        let seat = Arc::clone(agency.inner.seat("Alice").unwrap());

        agency.inner.workers.lock().accepting = false;
        assert_eq!(agency.inner.wake(&seat).unwrap(), Wake::Suspended);
        assert!(matches!(
            agency.inner.deliver(None, "Alice", "hi".into()),
            Err(CommsError::ShuttingDown)
        ));
        assert!(seat.mailbox.is_empty());
    }

    #[test]
    fn test_handle_outliving_agency() {
        let agency = Agency::new(vec![agent("Alice")]).unwrap();
        let handle = agency.handle();
        drop(agency);
        assert!(matches!(handle.run("Alice", Some("hi")), Err(CommsError::ShuttingDown)));
    }
}
