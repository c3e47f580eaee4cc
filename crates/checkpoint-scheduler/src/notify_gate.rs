// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification delivery gating (spec.md §4.7 "Notification semantics"):
//! urgency levels, a per-user quiet-hours window that suppresses
//! non-critical alerts, and a repeated-alert suppressor that re-notifies
//! only after `N` hours of continued fault.

use std::collections::HashMap;

use chrono::Timelike;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub urgency: Urgency,
    pub title: String,
    pub body: String,
    pub project_id: String,
    pub category: String,
}

/// A quiet-hours window given as `HH-HH` in local time, e.g. `22-07` for
/// 10pm through 7am, wrapping past midnight.
#[derive(Debug, Clone, Copy)]
pub struct QuietHours {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl QuietHours {
    pub fn parse(spec: &str) -> Option<Self> {
        let (start, end) = spec.split_once('-')?;
        let start_hour: u8 = start.trim().parse().ok()?;
        let end_hour: u8 = end.trim().parse().ok()?;
        if start_hour > 23 || end_hour > 23 {
            return None;
        }
        Some(Self { start_hour, end_hour })
    }

    pub fn contains(&self, hour: u32) -> bool {
        let hour = hour as u8;
        if self.start_hour == self.end_hour {
            false
        } else if self.start_hour < self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Tracks the last time each `(project_id, category)` pair was delivered so
/// a continued fault doesn't re-notify every tick.
#[derive(Debug, Default)]
pub struct RepeatSuppressor {
    last_sent_epoch_secs: HashMap<(String, String), u64>,
}

impl RepeatSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if enough time has passed (or this is the first time)
    /// to re-deliver this alert, and records the delivery if so.
    pub fn should_send(&mut self, alert: &Alert, now_epoch_secs: u64, repeat_after_hours: u64) -> bool {
        let key = (alert.project_id.clone(), alert.category.clone());
        let due = match self.last_sent_epoch_secs.get(&key) {
            Some(last) => now_epoch_secs.saturating_sub(*last) >= repeat_after_hours * 3600,
            None => true,
        };
        if due {
            self.last_sent_epoch_secs.insert(key, now_epoch_secs);
        }
        due
    }
}

/// Combines quiet hours and repeat suppression into a single gate decision.
pub struct NotifyGate {
    quiet_hours: Option<QuietHours>,
    repeat_after_hours: u64,
    suppressor: RepeatSuppressor,
}

impl NotifyGate {
    pub fn new(quiet_hours: Option<QuietHours>, repeat_after_hours: u64) -> Self {
        Self { quiet_hours, repeat_after_hours, suppressor: RepeatSuppressor::new() }
    }

    /// `true` if `alert` should be delivered right now. Critical alerts
    /// bypass quiet hours (spec.md: quiet hours "suppresses non-critical
    /// alerts") but are still subject to repeat suppression.
    pub fn should_deliver(&mut self, alert: &Alert, now: chrono::DateTime<chrono::Local>) -> bool {
        let now_epoch_secs = now.timestamp().max(0) as u64;
        if alert.urgency != Urgency::Critical {
            if let Some(qh) = self.quiet_hours {
                if qh.contains(now.hour()) {
                    return false;
                }
            }
        }
        self.suppressor.should_send(alert, now_epoch_secs, self.repeat_after_hours)
    }
}

#[cfg(test)]
#[path = "notify_gate_tests.rs"]
mod tests;
