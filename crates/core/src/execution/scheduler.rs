//! Dependency-ordered task scheduler
//!
//! Root tasks launch immediately, each on its own blocking worker. Whenever a
//! task finishes, every pending task whose prerequisites have all completed is
//! launched. Inline tasks run on the scheduler's own control path: once one is
//! ready it is awaited to completion before anything else is launched or
//! joined. A failed task blocks its dependents but never its siblings, and the
//! scheduler always joins every launched task before returning.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use petgraph::graph::NodeIndex;
use tokio::task::JoinSet;

use crate::configs::tasks::TaskMode;
use crate::execution::command::{CommandExecutor, Shell};
use crate::execution::events::{EventSink, ExecutionEvent};
use crate::graph::ExecutionGraph;
use crate::results::{CommandFailure, RunReport, TaskOutcome, TaskState};
use crate::types::{ProvisionError, ProvisionResult};

/// What a task worker hands back when it is joined
struct TaskRun {
    node: NodeIndex,
    elapsed: Duration,
    /// `Err` when the worker thread itself died
    result: Result<Result<(), CommandFailure>, String>,
}

pub struct Scheduler {
    shell: Arc<dyn Shell>,
    sink: Arc<dyn EventSink>,
}

impl Scheduler {
    pub fn new(shell: Arc<dyn Shell>, sink: Arc<dyn EventSink>) -> Self {
        Self { shell, sink }
    }

    /// Run every task of `graph`, honoring prerequisites.
    ///
    /// Returns a report of all task outcomes; use [`RunReport::into_result`]
    /// to turn a failed run into an error. `Err` is only returned when the
    /// scheduler itself could not keep track of its workers.
    pub async fn run(&self, graph: &ExecutionGraph) -> ProvisionResult<RunReport> {
        let started = Instant::now();
        let mut states: HashMap<NodeIndex, TaskState> =
            graph.nodes().map(|node| (node, TaskState::Pending)).collect();
        let mut outcomes = Vec::with_capacity(graph.len());
        let mut running: JoinSet<TaskRun> = JoinSet::new();

        loop {
            self.block_dependents_of_failures(graph, &mut states, &mut outcomes);

            let mut next_inline = None;
            for node in self.ready_tasks(graph, &states) {
                let task = graph.task(node);
                match task.mode {
                    TaskMode::Parallel => {
                        self.mark_running(graph, node, &mut states);
                        running.spawn(self.start(graph, node));
                    }
                    TaskMode::Inline => {
                        if next_inline.is_none() {
                            next_inline = Some(node);
                        }
                    }
                }
            }

            if let Some(node) = next_inline {
                self.mark_running(graph, node, &mut states);
                let run = self.start(graph, node).await;
                self.finish(graph, run, &mut states, &mut outcomes);
                continue;
            }

            match running.join_next().await {
                Some(Ok(run)) => self.finish(graph, run, &mut states, &mut outcomes),
                Some(Err(e)) => {
                    let message = format!("Lost track of a task worker: {}", e);
                    self.drain(graph, &mut running, &mut states, &mut outcomes)
                        .await;
                    return Err(ProvisionError::Task(message));
                }
                None => break,
            }
        }

        let elapsed = started.elapsed();
        log::debug!(
            "Scheduler finished {} task(s) in {:.2?}",
            outcomes.len(),
            elapsed
        );

        Ok(RunReport { outcomes, elapsed })
    }

    /// Join every worker still in `running`
    async fn drain(
        &self,
        graph: &ExecutionGraph,
        running: &mut JoinSet<TaskRun>,
        states: &mut HashMap<NodeIndex, TaskState>,
        outcomes: &mut Vec<TaskOutcome>,
    ) {
        while let Some(joined) = running.join_next().await {
            match joined {
                Ok(run) => self.finish(graph, run, states, outcomes),
                Err(e) => log::error!("Lost track of a task worker: {}", e),
            }
        }
    }

    /// Pending tasks whose prerequisites have all completed, in declaration order
    fn ready_tasks(
        &self,
        graph: &ExecutionGraph,
        states: &HashMap<NodeIndex, TaskState>,
    ) -> Vec<NodeIndex> {
        graph
            .nodes()
            .filter(|node| states[node] == TaskState::Pending)
            .filter(|&node| {
                graph
                    .prerequisites(node)
                    .all(|prerequisite| states[&prerequisite] == TaskState::Completed)
            })
            .collect()
    }

    fn mark_running(
        &self,
        graph: &ExecutionGraph,
        node: NodeIndex,
        states: &mut HashMap<NodeIndex, TaskState>,
    ) {
        let task = graph.task(node);
        log::debug!("Launching task '{}' ({:?})", task.name, task.mode);
        states.insert(node, TaskState::Running);
        self.sink.emit(&ExecutionEvent::TaskStarted {
            task: &task.name,
            mode: task.mode,
        });
    }

    /// Hand a task's commands to a blocking worker
    fn start(
        &self,
        graph: &ExecutionGraph,
        node: NodeIndex,
    ) -> impl Future<Output = TaskRun> + Send + 'static {
        let task = graph.task(node);
        let executor = CommandExecutor::new(Arc::clone(&self.shell), Arc::clone(&self.sink));
        let name = task.name.clone();
        let commands = task.commands.clone();

        async move {
            let started = Instant::now();
            let result =
                tokio::task::spawn_blocking(move || executor.run(&name, &commands)).await;
            TaskRun {
                node,
                elapsed: started.elapsed(),
                result: result.map_err(|e| e.to_string()),
            }
        }
    }

    fn finish(
        &self,
        graph: &ExecutionGraph,
        run: TaskRun,
        states: &mut HashMap<NodeIndex, TaskState>,
        outcomes: &mut Vec<TaskOutcome>,
    ) {
        let name = &graph.task(run.node).name;

        let (state, failure) = match run.result {
            Ok(Ok(())) => {
                log::debug!("Task '{}' completed in {:.2?}", name, run.elapsed);
                self.sink.emit(&ExecutionEvent::TaskCompleted {
                    task: name,
                    elapsed: run.elapsed,
                });
                (TaskState::Completed, None)
            }
            Ok(Err(failure)) => {
                log::debug!("Task '{}' failed: {}", name, failure);
                self.sink.emit(&ExecutionEvent::TaskFailed {
                    task: name,
                    failure: &failure,
                });
                (TaskState::Failed, Some(failure))
            }
            Err(message) => {
                log::error!("Worker for task '{}' stopped: {}", name, message);
                (TaskState::Failed, None)
            }
        };

        states.insert(run.node, state);
        outcomes.push(TaskOutcome {
            name: name.clone(),
            state,
            elapsed: run.elapsed,
            failure,
        });
    }

    /// Move every pending task with a failed or blocked prerequisite to `Blocked`
    fn block_dependents_of_failures(
        &self,
        graph: &ExecutionGraph,
        states: &mut HashMap<NodeIndex, TaskState>,
        outcomes: &mut Vec<TaskOutcome>,
    ) {
        // Topological order lets a single pass propagate through chains
        for &node in graph.topological_order() {
            if states[&node] != TaskState::Pending {
                continue;
            }

            let blocker = graph.prerequisites(node).find(|prerequisite| {
                matches!(
                    states[prerequisite],
                    TaskState::Failed | TaskState::Blocked
                )
            });

            if let Some(blocker) = blocker {
                let name = &graph.task(node).name;
                let blocked_by = &graph.task(blocker).name;
                log::debug!("Task '{}' blocked by '{}'", name, blocked_by);
                self.sink.emit(&ExecutionEvent::TaskBlocked {
                    task: name,
                    blocked_by,
                });
                states.insert(node, TaskState::Blocked);
                outcomes.push(TaskOutcome {
                    name: name.clone(),
                    state: TaskState::Blocked,
                    elapsed: Duration::ZERO,
                    failure: None,
                });
            }
        }
    }
}
