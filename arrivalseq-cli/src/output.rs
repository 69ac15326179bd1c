//! Plain-text rendering of sequence snapshots.

use arrivalseq::sequence::SequenceSnapshot;
use arrivalseq::time::format_delay;
use chrono::{DateTime, Duration, Utc};

fn hms(time: DateTime<Utc>) -> String {
    time.format("%H:%M:%S").to_string()
}

fn hms_opt(time: Option<DateTime<Utc>>) -> String {
    time.map(hms).unwrap_or_else(|| "-".to_string())
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Render a snapshot as a table.
pub fn render_snapshot(snapshot: &SequenceSnapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}  runway mode {}",
        snapshot.airport, snapshot.runway_mode
    ));
    if let Some(next) = &snapshot.next_runway_mode {
        out.push_str(&format!(
            "  next {} (last {}, first {})",
            next,
            hms_opt(snapshot.last_landing_time_for_current_mode),
            hms_opt(snapshot.first_landing_time_for_new_mode)
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "  {:>2}  {:<8}  {:<4}  {:<1}  {:<6}  {:<4}  {:<11}  {:>8}  {:>8}  {:>8}  {:>6}\n",
        "#", "Callsign", "Type", "W", "FF", "Rwy", "State", "FF time", "ETA", "STA", "Delay"
    ));
    for flight in &snapshot.flights {
        let mut flags = String::new();
        if flight.manual_landing_time {
            flags.push('M');
        }
        if flight.high_priority {
            flags.push('P');
        }
        if flight.no_delay {
            flags.push('N');
        }

        out.push_str(&format!(
            "  {:>2}  {:<8}  {:<4}  {:<1}  {:<6}  {:<4}  {:<11}  {:>8}  {:>8}  {:>8}  {:>6}  {}\n",
            flight.sequence_number,
            flight.callsign,
            flight.aircraft_type,
            flight.wake_category,
            flight.feeder_fix.as_deref().unwrap_or("-"),
            flight.runway.as_deref().unwrap_or("-"),
            flight.state.to_string(),
            hms_opt(flight.scheduled_feeder_fix_time),
            hms(flight.landing_estimate),
            hms(flight.scheduled_landing_time),
            format_delay(Duration::seconds(flight.total_delay_secs)),
            flags
        ));
    }

    out.push_str(&format!("  Pending: {}\n", list_or_dash(&snapshot.pending)));
    out.push_str(&format!("  Desequenced: {}\n", list_or_dash(&snapshot.desequenced)));

    for blockout in &snapshot.blockouts {
        out.push_str(&format!(
            "  Blockout {} {}-{}\n",
            blockout.runway_identifiers.join("/"),
            hms(blockout.start_time),
            hms(blockout.end_time)
        ));
    }
    for slot in &snapshot.slots {
        out.push_str(&format!(
            "  Slot {} {} {}-{}\n",
            slot.id,
            slot.runway_identifiers.join("/"),
            hms(slot.start_time),
            hms(slot.end_time)
        ));
    }

    out
}
