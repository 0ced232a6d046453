//! Timer task that drives a [`RouteAnimator`] and publishes its frames.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::{Frame, RouteAnimator};

#[derive(Debug)]
enum Command {
    Select(usize),
    Deselect,
}

/// Owner of a running animation task.
///
/// Dropping the handle aborts the task, so no tick can fire after the
/// checkpoints it animates have been replaced.
pub struct AnimationHandle {
    frames: watch::Receiver<Frame>,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    /// A receiver that observes every published frame.
    #[must_use]
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// The most recently published frame.
    #[must_use]
    pub fn latest(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// Freezes on the checkpoint with `checkpoint_id`.
    pub fn select(&self, checkpoint_id: usize) {
        self.send(Command::Select(checkpoint_id));
    }

    pub fn deselect(&self) {
        self.send(Command::Deselect);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.commands.send(command) {
            tracing::debug!(command = ?e.0, "animation task already stopped");
        }
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the animation loop on the current tokio runtime.
///
/// One frame is published per tick of `duration / steps`; late ticks are
/// skipped rather than replayed in a burst.
#[must_use]
pub fn spawn_animation(animator: RouteAnimator) -> AnimationHandle {
    let (frame_tx, frame_rx) = watch::channel(animator.frame());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(animator, frame_tx, command_rx));

    AnimationHandle {
        frames: frame_rx,
        commands: command_tx,
        task,
    }
}

async fn run(
    mut animator: RouteAnimator,
    frames: watch::Sender<Frame>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let mut ticker = time::interval(animator.config().tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; frame 0 is already published.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !animator.is_moving() {
                    continue;
                }
                animator.tick();
            }
            command = commands.recv() => match command {
                Some(Command::Select(checkpoint_id)) => {
                    if !animator.select(checkpoint_id) {
                        tracing::warn!(checkpoint_id, "ignoring selection of unknown checkpoint");
                        continue;
                    }
                }
                Some(Command::Deselect) => animator.deselect(),
                None => break,
            },
        }

        if frames.send(animator.frame()).is_err() {
            break;
        }
    }
}
