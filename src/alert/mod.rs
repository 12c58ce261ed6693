//! Shared cross-agent alert registry
//!
//! One record per alert channel. Records are last-write-wins registers:
//! re-raising an alert is an idempotent refresh, and clears are deferred
//! so a brief trigger still gives guards time to react. The expiry timer
//! is lazily checked while agents sense the record; a channel nobody is
//! sensing never expires, which is acceptable because no guard is idle
//! while an alert matters.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, Vec3};

/// Event source category; each channel owns exactly one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertChannel {
    /// Laser tripwire grid
    Laser,
    /// Audible disturbance (thrown object, loud footsteps)
    Noise,
}

/// Snapshot handed to responders so a stale clear cannot erase a fresh raise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSnapshot {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct AlertRecord {
    active: bool,
    position: Vec3,
    /// Stable id of the triggering device, when one exists; the position
    /// is a fallback for anchor-less raises
    anchor: Option<u64>,
    /// When set, only this agent may act on the record
    assigned: Option<AgentId>,
    /// Seconds the record survives after its source deactivates
    hold_seconds: f32,
    /// Whether a responder finishing its investigation consumes the record
    clear_on_consume: bool,
    /// Absolute sim-time deadline for a deferred clear
    clear_deadline: Option<f64>,
    /// Bumped on every raise; supersedes outstanding snapshots
    generation: u64,
}

impl AlertRecord {
    fn new(hold_seconds: f32, clear_on_consume: bool) -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
            anchor: None,
            assigned: None,
            hold_seconds,
            clear_on_consume,
            clear_deadline: None,
            generation: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn assigned(&self) -> Option<AgentId> {
        self.assigned
    }

    pub fn clear_on_consume(&self) -> bool {
        self.clear_on_consume
    }
}

/// Process-wide alert registry, shared by every guard
#[derive(Debug)]
pub struct AlertCoordinator {
    records: AHashMap<AlertChannel, AlertRecord>,
}

impl Default for AlertCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertCoordinator {
    pub fn new() -> Self {
        let mut records = AHashMap::new();
        records.insert(AlertChannel::Laser, AlertRecord::new(8.0, false));
        records.insert(AlertChannel::Noise, AlertRecord::new(4.0, true));
        Self { records }
    }

    /// Override a channel's hold/consume policy (loaded from config)
    pub fn configure(&mut self, channel: AlertChannel, hold_seconds: f32, clear_on_consume: bool) {
        let record = self.records.entry(channel).or_insert_with(|| AlertRecord::new(hold_seconds, clear_on_consume));
        record.hold_seconds = hold_seconds;
        record.clear_on_consume = clear_on_consume;
    }

    /// Activate (or refresh) a channel
    ///
    /// Overwrites anchor and position, cancels any pending deferred
    /// clear, and optionally restricts the record to one responder.
    /// Omitting the responder leaves a fresh record open to all agents;
    /// on a re-raise it never revokes a standing claim, so a responder
    /// already en route keeps the record through source flicker. Only
    /// `release_assignment` and a clear give the record back.
    pub fn raise(
        &mut self,
        channel: AlertChannel,
        position: Vec3,
        anchor: Option<u64>,
        exclusive_responder: Option<AgentId>,
    ) -> AnchorSnapshot {
        let record = self.record_mut(channel);
        record.active = true;
        record.position = position;
        record.anchor = anchor;
        record.clear_deadline = None;
        record.generation += 1;
        if exclusive_responder.is_some() {
            record.assigned = exclusive_responder;
        }
        tracing::debug!(?channel, ?anchor, "alert raised");
        AnchorSnapshot { generation: record.generation }
    }

    /// The triggering source turned off; schedule a clear instead of
    /// clearing immediately so short triggers still draw a response.
    pub fn on_source_deactivated(&mut self, channel: AlertChannel, now: f64) {
        let record = self.record_mut(channel);
        if record.active && record.clear_deadline.is_none() {
            record.clear_deadline = Some(now + record.hold_seconds as f64);
        }
    }

    /// Clear only if the snapshot still names the latest raise
    ///
    /// Returns true when the clear happened. A responder holding a stale
    /// snapshot (the channel re-raised since) leaves the record alone.
    pub fn try_clear_for_anchor(&mut self, channel: AlertChannel, snapshot: AnchorSnapshot) -> bool {
        let record = self.record_mut(channel);
        if record.generation == snapshot.generation {
            Self::clear_record(record);
            true
        } else {
            false
        }
    }

    /// Lazy deferred-clear check, invoked once per sensing pass per agent
    pub fn update_timer(&mut self, channel: AlertChannel, now: f64) {
        let record = self.record_mut(channel);
        if let Some(deadline) = record.clear_deadline {
            if now >= deadline {
                Self::clear_record(record);
                tracing::debug!(?channel, "alert expired");
            }
        }
    }

    /// Claim exclusive response; first caller wins
    pub fn assign(&mut self, channel: AlertChannel, agent: AgentId) -> bool {
        let record = self.record_mut(channel);
        if !record.active {
            return false;
        }
        match record.assigned {
            None => {
                record.assigned = Some(agent);
                true
            }
            Some(existing) => existing == agent,
        }
    }

    pub fn release_assignment(&mut self, channel: AlertChannel, agent: AgentId) {
        let record = self.record_mut(channel);
        if record.assigned == Some(agent) {
            record.assigned = None;
        }
    }

    /// The record as one agent may see it
    ///
    /// An alert assigned to someone else is invisible as an actionable
    /// target: this returns None for every agent but the responder.
    pub fn visible_to(&self, channel: AlertChannel, agent: AgentId) -> Option<&AlertRecord> {
        let record = self.records.get(&channel)?;
        if !record.active {
            return None;
        }
        match record.assigned {
            Some(responder) if responder != agent => None,
            _ => Some(record),
        }
    }

    pub fn record(&self, channel: AlertChannel) -> Option<&AlertRecord> {
        self.records.get(&channel)
    }

    pub fn snapshot(&self, channel: AlertChannel) -> Option<AnchorSnapshot> {
        self.records
            .get(&channel)
            .filter(|r| r.active)
            .map(|r| AnchorSnapshot { generation: r.generation })
    }

    pub fn any_active(&self) -> bool {
        self.records.values().any(|r| r.active)
    }

    /// Checkpoint/retry reset
    pub fn reset(&mut self) {
        for record in self.records.values_mut() {
            Self::clear_record(record);
        }
    }

    fn clear_record(record: &mut AlertRecord) {
        record.active = false;
        record.assigned = None;
        record.anchor = None;
        record.clear_deadline = None;
    }

    fn record_mut(&mut self, channel: AlertChannel) -> &mut AlertRecord {
        self.records.entry(channel).or_insert_with(|| AlertRecord::new(8.0, false))
    }
}
