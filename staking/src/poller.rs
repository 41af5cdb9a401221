//! Background refresh of the reward vector.

use crate::{
    error::{Result, StakingError},
    sync::PoolSynchronizer,
};
use log::debug;
use std::{
    sync::{
        mpsc::{self, RecvTimeoutError, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// A running reward poll loop.
///
/// Ticks are sequential: the wait for the next tick starts only once the
/// current one has finished, so a slow node stretches the interval instead
/// of piling up queries. Stopping (or dropping) the handle cancels the pending
/// wait and joins the thread; no query is issued afterwards.
pub struct RewardPoller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RewardPoller {
    pub fn start(sync: Arc<PoolSynchronizer>, interval: Duration) -> Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("reward-poller".to_string())
            .spawn(move || loop {
                let rewards = sync.refresh_rewards();
                debug!("polled rewards for {} pools", rewards.len());
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|err| StakingError::Call(format!("failed to spawn reward poller: {}", err)))?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // a send error only means the loop is already gone
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RewardPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
