//! Greedy auto-fill of empty slots, balancing volunteer load.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::models::{Slot, Volunteer};

/// Volunteers qualified and available for a slot, sorted by name.
///
/// A volunteer is eligible when qualified for the slot's area, compatible
/// with the slot's team (unassigned volunteers match everything, as does a
/// slot without a team), and available for the event.
pub fn eligible_volunteers<'a>(slot: &Slot, volunteers: &'a [Volunteer]) -> Vec<&'a Volunteer> {
    let mut eligible: Vec<&Volunteer> = volunteers
        .iter()
        .filter(|v| {
            v.areas.iter().any(|a| a == &slot.area)
                && v.team.matches(slot.team.as_deref())
                && v.availability.iter().any(|e| e == &slot.event)
        })
        .collect();
    eligible.sort_by(|a, b| a.name.cmp(&b.name));
    eligible
}

/// Fill every empty slot greedily, preferring the least-loaded eligible
/// volunteer.
///
/// Assignment counters start at zero for every roster volunteer and are
/// pre-seeded with the manual assignments already on the slot list, so
/// manual picks weigh on fairness from the first slot. A volunteer already
/// booked for the same (date, event) is skipped. Ties on load go to the
/// first name in alphabetical order. Slots with no candidate left are
/// returned unchanged; the pass never backtracks.
pub fn auto_fill(slots: &[Slot], volunteers: &[Volunteer]) -> Vec<Slot> {
    let mut counts: HashMap<&str, u32> = volunteers.iter().map(|v| (v.id.as_str(), 0)).collect();
    let mut booked: HashMap<(NaiveDate, &str), HashSet<&str>> = HashMap::new();

    for slot in slots {
        if let Some(id) = slot.volunteer_id.as_deref() {
            *counts.entry(id).or_insert(0) += 1;
            booked
                .entry((slot.date, slot.event.as_str()))
                .or_default()
                .insert(id);
        }
    }

    let mut filled = Vec::with_capacity(slots.len());
    for slot in slots {
        if slot.volunteer_id.is_some() {
            filled.push(slot.clone());
            continue;
        }

        let taken = booked.get(&(slot.date, slot.event.as_str()));
        let candidates: Vec<&Volunteer> = eligible_volunteers(slot, volunteers)
            .into_iter()
            .filter(|v| taken.map_or(true, |set| !set.contains(v.id.as_str())))
            .collect();

        // First strictly-smaller load wins, so equal loads keep the
        // alphabetical order from the candidate list.
        let mut pick: Option<&Volunteer> = None;
        for candidate in candidates {
            let load = counts.get(candidate.id.as_str()).copied().unwrap_or(0);
            match pick {
                Some(best) if counts.get(best.id.as_str()).copied().unwrap_or(0) <= load => {}
                _ => pick = Some(candidate),
            }
        }

        match pick {
            Some(volunteer) => {
                *counts.entry(volunteer.id.as_str()).or_insert(0) += 1;
                booked
                    .entry((slot.date, slot.event.as_str()))
                    .or_default()
                    .insert(volunteer.id.as_str());
                let mut assigned = slot.clone();
                assigned.volunteer_id = Some(volunteer.id.clone());
                filled.push(assigned);
            }
            None => filled.push(slot.clone()),
        }
    }
    filled
}
