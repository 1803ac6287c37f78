//! Time-bounded value ramps with start/complete checkpoints.
//!
//! Every kind belongs to a channel, the parameter family it drives. At most
//! one record runs per (channel, target); starting another one retires the
//! running record without its completion checkpoint and continues from the
//! value it had reached. Checkpoints are returned from [`TransitionEngine::advance`]
//! as events keyed by stable handles, so callers never hand closures to the
//! engine.

use crate::config::Motion;
use crate::easing::Ease;
use crate::registry::{ParamName, PlaneId, Transform};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Open,
    Close,
    SlideNext,
    SlidePrev,
    Show,
    Hide,
    Hover,
}

/// Parameter family a transition writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Transform,
    Visibility,
    Slide,
    Hover,
}

impl TransitionKind {
    pub fn channel(self) -> Channel {
        match self {
            TransitionKind::Open | TransitionKind::Close => Channel::Transform,
            TransitionKind::Show | TransitionKind::Hide => Channel::Visibility,
            TransitionKind::SlideNext | TransitionKind::SlidePrev => Channel::Slide,
            TransitionKind::Hover => Channel::Hover,
        }
    }
}

/// A value written into a plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    Param(ParamName, f32),
    Transform(Transform),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ramp {
    Param {
        name: ParamName,
        from: f32,
        to: f32,
    },
    Transform {
        from: Transform,
        to: Transform,
    },
}

impl Ramp {
    fn sample(&self, p: f32) -> Sample {
        match self {
            Ramp::Param { name, from, to } => {
                if p >= 1.0 {
                    Sample::Param(*name, *to)
                } else {
                    Sample::Param(*name, from + (to - from) * p)
                }
            }
            Ramp::Transform { from, to } => {
                if p >= 1.0 {
                    Sample::Transform(*to)
                } else {
                    Sample::Transform(from.lerp(to, p))
                }
            }
        }
    }

    // New start value such that the sample at eased progress `e` is
    // unchanged while the ramp heads for `to`.
    fn retarget(&mut self, to: Sample, e: f32) -> bool {
        let current = self.sample(e);
        let keep = 1.0 - e;
        match (self, to, current) {
            (Ramp::Transform { from, to: end }, Sample::Transform(t), Sample::Transform(cur)) => {
                if keep > f32::EPSILON {
                    *from = Transform {
                        position: (cur.position - t.position * e) / keep,
                        scale: (cur.scale - t.scale * e) / keep,
                        rotation: (cur.rotation - t.rotation * e) / keep,
                    };
                } else {
                    *from = t;
                }
                *end = t;
                true
            }
            (Ramp::Param { name, from, to: end }, Sample::Param(n, v), Sample::Param(_, cur)) if *name == n => {
                *from = if keep > f32::EPSILON { (cur - v * e) / keep } else { v };
                *end = v;
                true
            }
            _ => false,
        }
    }

    // Restart from a superseded record's value when both drive the same thing.
    fn restart_from(self, current: Sample) -> Ramp {
        match (self, current) {
            (Ramp::Param { name, to, .. }, Sample::Param(cur_name, value)) if name == cur_name => {
                Ramp::Param {
                    name,
                    from: value,
                    to,
                }
            }
            (Ramp::Transform { to, .. }, Sample::Transform(value)) => Ramp::Transform { from: value, to },
            (ramp, _) => ramp,
        }
    }
}

/// Everything needed to start a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSpec {
    pub kind: TransitionKind,
    pub target: PlaneId,
    pub ramp: Ramp,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
}

impl TransitionSpec {
    pub fn param(kind: TransitionKind, target: PlaneId, name: ParamName, from: f32, to: f32) -> Self {
        Self {
            kind,
            target,
            ramp: Ramp::Param { name, from, to },
            duration: 1.0,
            delay: 0.0,
            ease: Ease::Linear,
        }
    }

    pub fn transform(kind: TransitionKind, target: PlaneId, from: Transform, to: Transform) -> Self {
        Self {
            kind,
            target,
            ramp: Ramp::Transform { from, to },
            duration: 1.0,
            delay: 0.0,
            ease: Ease::Linear,
        }
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn timing(self, motion: &Motion) -> Self {
        self.duration(motion.duration_sec)
            .delay(motion.delay_sec)
            .ease(motion.ease)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionHandle(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord {
    pub handle: TransitionHandle,
    pub kind: TransitionKind,
    pub target: PlaneId,
    pub ramp: Ramp,
    pub duration: f32,
    /// Seconds since start; negative while a delay is pending.
    pub elapsed: f32,
    pub ease: Ease,
    started: bool,
}

impl TransitionRecord {
    /// Linear progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.elapsed <= 0.0 {
            0.0
        } else if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn value(&self) -> Sample {
        let p = self.progress();
        if p >= 1.0 {
            self.ramp.sample(1.0)
        } else {
            self.ramp.sample(self.ease.apply(p))
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Checkpoint {
    Started,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    pub handle: TransitionHandle,
    pub kind: TransitionKind,
    pub target: PlaneId,
    pub checkpoint: Checkpoint,
}

pub type TransitionEvents = SmallVec<[TransitionEvent; 4]>;

/// Receives interpolated values. Implemented by the scene registry.
pub trait TransitionSink {
    fn apply(&mut self, target: PlaneId, sample: Sample);
}

#[derive(Default)]
pub struct TransitionEngine {
    running: Vec<TransitionRecord>,
    next_handle: u64,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, spec: TransitionSpec) -> TransitionHandle {
        let channel = spec.kind.channel();
        let mut ramp = spec.ramp;
        if let Some(pos) = self
            .running
            .iter()
            .position(|r| r.target == spec.target && r.kind.channel() == channel)
        {
            let prior = self.running.remove(pos);
            if prior.started {
                ramp = ramp.restart_from(prior.value());
            }
            log::debug!(
                "[transition] {:?} on plane {} supersedes {:?} at {:.0}%",
                spec.kind,
                spec.target.0,
                prior.kind,
                prior.progress() * 100.0
            );
        }
        let handle = TransitionHandle(self.next_handle);
        self.next_handle += 1;
        self.running.push(TransitionRecord {
            handle,
            kind: spec.kind,
            target: spec.target,
            ramp,
            duration: spec.duration.max(0.0),
            elapsed: -spec.delay.max(0.0),
            ease: spec.ease,
            started: false,
        });
        handle
    }

    /// Advance every running record by `dt` seconds, write values into
    /// `sink` and report the checkpoints crossed in this step.
    pub fn advance(&mut self, dt: f32, sink: &mut impl TransitionSink) -> TransitionEvents {
        let dt = dt.max(0.0);
        let mut events = TransitionEvents::new();
        let mut i = 0;
        while i < self.running.len() {
            let rec = &mut self.running[i];
            rec.elapsed += dt;
            if rec.elapsed <= 0.0 {
                i += 1;
                continue;
            }
            if !rec.started {
                rec.started = true;
                events.push(event(rec, Checkpoint::Started));
            }
            sink.apply(rec.target, rec.value());
            if rec.progress() >= 1.0 {
                events.push(event(rec, Checkpoint::Completed));
                self.running.remove(i);
            } else {
                i += 1;
            }
        }
        events
    }

    /// Move the end value of a running record without restarting it. The
    /// current value and the remaining time are kept, so the motion bends
    /// toward the new end instead of jumping.
    pub fn retarget(&mut self, handle: TransitionHandle, to: Sample) -> bool {
        let Some(rec) = self.running.iter_mut().find(|r| r.handle == handle) else {
            return false;
        };
        let e = rec.ease.apply(rec.progress());
        rec.ramp.retarget(to, e)
    }

    /// Drop a record without its completion checkpoint.
    pub fn cancel(&mut self, handle: TransitionHandle) -> bool {
        let before = self.running.len();
        self.running.retain(|r| r.handle != handle);
        self.running.len() != before
    }

    pub fn cancel_target(&mut self, target: PlaneId) -> usize {
        let before = self.running.len();
        self.running.retain(|r| r.target != target);
        before - self.running.len()
    }

    pub fn is_running(&self, handle: TransitionHandle) -> bool {
        self.running.iter().any(|r| r.handle == handle)
    }

    pub fn get(&self, handle: TransitionHandle) -> Option<&TransitionRecord> {
        self.running.iter().find(|r| r.handle == handle)
    }

    pub fn running(&self, kind: TransitionKind, target: PlaneId) -> impl Iterator<Item = &TransitionRecord> {
        self.running
            .iter()
            .filter(move |r| r.kind == kind && r.target == target)
    }

    pub fn on_channel(&self, channel: Channel, target: PlaneId) -> Option<&TransitionRecord> {
        self.running
            .iter()
            .find(|r| r.target == target && r.kind.channel() == channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.running.iter()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

fn event(rec: &TransitionRecord, checkpoint: Checkpoint) -> TransitionEvent {
    TransitionEvent {
        handle: rec.handle,
        kind: rec.kind,
        target: rec.target,
        checkpoint,
    }
}
