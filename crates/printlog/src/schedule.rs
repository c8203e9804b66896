//! Periodic re-execution of the ingestion run as a child process.

use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use tokio::process::Command;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::config::ScheduleConfig;
use crate::process::current_thread_runtime;

/// What happened to one scheduled run.
#[derive(Debug)]
pub enum TickOutcome {
    Finished(ExitStatus),
    TimedOut,
    SpawnFailed(std::io::Error),
}

/// Stops a running [`Scheduler`]. Safe to trigger from a signal handler thread.
#[derive(Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Release);
        // A stored permit wakes the loop even if it is mid-run right now.
        self.notify.notify_one();
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Runs a command on a fixed interval, at most one instance at a time.
///
/// Each run is killed once it exceeds the run timeout. A run that overlaps
/// the next tick delays it rather than triggering a burst of catch-up runs.
pub struct Scheduler {
    program: OsString,
    args: Vec<OsString>,
    interval: Duration,
    run_timeout: Duration,
    shutdown: ShutdownHandle,
}

impl Scheduler {
    pub fn new<I, A>(program: impl Into<OsString>, args: I, interval: Duration, run_timeout: Duration) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            interval,
            run_timeout,
            shutdown: ShutdownHandle::default(),
        }
    }

    pub fn from_config<I, A>(program: impl Into<OsString>, args: I, config: &ScheduleConfig) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self::new(program, args, config.interval(), config.run_timeout())
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Runs the command once, blocking until it exits or is killed.
    pub fn run_once(&self) -> TickOutcome {
        match current_thread_runtime() {
            Ok(rt) => rt.block_on(self.tick()),
            Err(e) => TickOutcome::SpawnFailed(e),
        }
    }

    async fn tick(&self) -> TickOutcome {
        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return TickOutcome::SpawnFailed(e),
        };

        match tokio::time::timeout(self.run_timeout, child.wait()).await {
            Ok(Ok(status)) => TickOutcome::Finished(status),
            Ok(Err(e)) => TickOutcome::SpawnFailed(e),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    debug!("Killing timed-out run failed: {}", e);
                }
                TickOutcome::TimedOut
            }
        }
    }

    /// Loops until shutdown. Returns the number of runs started.
    pub fn run(&self) -> std::io::Result<usize> {
        info!(
            "Scheduler started: every {}s, run timeout {}s",
            self.interval.as_secs(),
            self.run_timeout.as_secs()
        );

        let rt = current_thread_runtime()?;
        let runs = rt.block_on(self.run_loop());

        info!("Scheduler stopped after {} runs", runs);
        Ok(runs)
    }

    async fn run_loop(&self) -> usize {
        // tokio panics on a zero period.
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut runs = 0;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.shutdown.notify.notified() => {}
            }
            if self.is_shutdown() {
                break;
            }

            let started = Instant::now();
            runs += 1;

            match self.tick().await {
                TickOutcome::Finished(status) if status.success() => {
                    debug!("Run {} finished in {:?}", runs, started.elapsed());
                }
                TickOutcome::Finished(status) => warn!("Run {} exited with {}", runs, status),
                TickOutcome::TimedOut => {
                    warn!("Run {} exceeded {}s and was killed", runs, self.run_timeout.as_secs())
                }
                TickOutcome::SpawnFailed(e) => error!("Run {} could not be started: {}", runs, e),
            }
        }
        runs
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, interval: Duration, timeout: Duration) -> Scheduler {
        Scheduler::new("sh", ["-c", script], interval, timeout)
    }

    #[test]
    fn test_run_once_success() {
        let scheduler = sh("exit 0", Duration::from_secs(1), Duration::from_secs(5));
        assert!(matches!(scheduler.run_once(), TickOutcome::Finished(s) if s.success()));
    }

    #[test]
    fn test_run_once_reports_failure_status() {
        let scheduler = sh("exit 4", Duration::from_secs(1), Duration::from_secs(5));
        match scheduler.run_once() {
            TickOutcome::Finished(status) => assert_eq!(status.code(), Some(4)),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_run_once_kills_on_timeout() {
        let scheduler = sh("sleep 30; true", Duration::from_secs(1), Duration::from_millis(200));
        let started = Instant::now();
        assert!(matches!(scheduler.run_once(), TickOutcome::TimedOut));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_run_once_spawn_failure() {
        let scheduler = Scheduler::new(
            "/definitely/not/a/program",
            Vec::<String>::new(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert!(matches!(scheduler.run_once(), TickOutcome::SpawnFailed(_)));
    }

    #[test]
    fn test_no_runs_after_shutdown() {
        let scheduler = sh("exit 0", Duration::from_millis(10), Duration::from_secs(5));
        scheduler.shutdown();
        assert_eq!(scheduler.run().unwrap(), 0);
    }

    #[test]
    fn test_loop_stops_on_shutdown() {
        let scheduler = sh("exit 0", Duration::from_secs(60), Duration::from_secs(5));
        let handle = scheduler.shutdown_handle();

        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(300));
            handle.trigger();
        });

        let started = Instant::now();
        let runs = scheduler.run().unwrap();
        stopper.join().unwrap();

        assert_eq!(runs, 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_repeats_on_interval() {
        let scheduler = sh("exit 0", Duration::from_millis(100), Duration::from_secs(5));
        let handle = scheduler.shutdown_handle();

        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(750));
            handle.trigger();
        });

        let runs = scheduler.run().unwrap();
        stopper.join().unwrap();
        assert!(runs >= 3, "only {runs} runs");
    }

    #[test]
    fn test_from_config() {
        let config = ScheduleConfig {
            interval_secs: 300,
            run_timeout_secs: 60,
        };
        let scheduler = Scheduler::from_config("printlog", ["run"], &config);
        assert_eq!(scheduler.interval, Duration::from_secs(300));
        assert_eq!(scheduler.run_timeout, Duration::from_secs(60));
        assert!(!scheduler.is_shutdown());
    }
}
