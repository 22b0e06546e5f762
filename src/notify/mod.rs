//! Notification dispatch for saved schedules.
//!
//! Dispatch walks the roster, builds one personal message per volunteer who
//! has at least one assignment in the schedule and a contact address for
//! the channel, and hands it to a [`MessageTransport`]. Per-message failures
//! are logged and do not stop the run; the outcome reports how many messages
//! actually went out.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use log::{error, info};

use crate::models::{SavedSchedule, ScheduleDay, Volunteer};

pub mod email;
pub mod template;
pub mod whatsapp;

pub use email::MailRelayTransport;
pub use whatsapp::TwilioWhatsAppTransport;

/// Delivery channel for schedule notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    WhatsApp,
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "whatsapp" => Ok(Self::WhatsApp),
            _ => Err(format!("Unknown notification channel: {s}")),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::WhatsApp => f.write_str("whatsapp"),
        }
    }
}

/// One message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Channel address: an email address or a phone number.
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Delivery backend for one channel.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> anyhow::Result<()>;
}

/// Result of one notification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOutcome {
    /// True when at least one message was delivered.
    pub success: bool,
    pub sent_count: usize,
    pub error: Option<String>,
}

/// A volunteer's assignments within one schedule, for message building.
struct PersonalRoster<'a> {
    volunteer: &'a Volunteer,
    entries: Vec<template::AssignmentEntry>,
}

fn personal_roster<'a>(days: &[ScheduleDay], volunteer: &'a Volunteer) -> PersonalRoster<'a> {
    let entries = days
        .iter()
        .flat_map(|day| {
            day.assignments
                .iter()
                .filter(|a| a.volunteer.as_deref() == Some(volunteer.name.as_str()))
                .map(|a| template::AssignmentEntry {
                    date: day.date.to_string(),
                    day_of_week: day.day_of_week.clone(),
                    event: a.event.clone(),
                    area: a.area.clone(),
                })
        })
        .collect();
    PersonalRoster { volunteer, entries }
}

fn contact_for(volunteer: &Volunteer, channel: Channel) -> Option<&str> {
    match channel {
        Channel::Email => volunteer.email.as_deref(),
        Channel::WhatsApp => volunteer.phone.as_deref(),
    }
}

/// Send the schedule to every volunteer with assignments in it.
///
/// Delivery keeps going past individual failures; `success` is false only
/// when nothing was sent, including the case of no reachable recipients.
pub async fn notify_volunteers(
    schedule: &SavedSchedule,
    volunteers: &[Volunteer],
    channel: Channel,
    transport: &dyn MessageTransport,
) -> NotificationOutcome {
    let recipients: Vec<(PersonalRoster<'_>, &str)> = volunteers
        .iter()
        .filter_map(|v| {
            let contact = contact_for(v, channel)?;
            let roster = personal_roster(&schedule.data.days, v);
            if roster.entries.is_empty() {
                return None;
            }
            Some((roster, contact))
        })
        .collect();

    if recipients.is_empty() {
        return NotificationOutcome {
            success: false,
            sent_count: 0,
            error: Some(format!(
                "no volunteers with assignments and a {channel} contact"
            )),
        };
    }

    let mut sent = 0usize;
    let mut failures: Vec<String> = Vec::new();
    for (roster, contact) in recipients {
        let message = match build_message(schedule, &roster, contact, channel) {
            Ok(m) => m,
            Err(e) => {
                error!("message for {} could not be built: {e}", roster.volunteer.name);
                failures.push(format!("{}: {e}", roster.volunteer.name));
                continue;
            }
        };
        match transport.deliver(&message).await {
            Ok(()) => sent += 1,
            Err(e) => {
                error!("delivery to {} failed: {e}", roster.volunteer.name);
                failures.push(format!("{}: {e}", roster.volunteer.name));
            }
        }
    }

    info!(
        "notification run for '{}' via {channel}: {sent} sent, {} failed",
        schedule.title,
        failures.len()
    );
    NotificationOutcome {
        success: sent > 0,
        sent_count: sent,
        error: if failures.is_empty() {
            None
        } else {
            Some(failures.join("; "))
        },
    }
}

fn build_message(
    schedule: &SavedSchedule,
    roster: &PersonalRoster<'_>,
    contact: &str,
    channel: Channel,
) -> anyhow::Result<OutboundMessage> {
    let subject = format!("Your assignments: {}", schedule.title);
    let body = match channel {
        Channel::Email => {
            template::render_email(&roster.volunteer.name, &schedule.title, &roster.entries)?
        }
        Channel::WhatsApp => {
            template::plain_text(&roster.volunteer.name, &schedule.title, &roster.entries)
        }
    };
    Ok(OutboundMessage {
        recipient: contact.to_string(),
        subject,
        body,
    })
}
