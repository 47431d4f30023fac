//! Work-order automation and ticket progression.
//!
//! When an asset's health drops below the threshold, automation reserves
//! the category's critical spare part (if in stock), opens a maintenance
//! ticket and takes the asset out of service. All of it happens on a copy
//! of the asset that the caller commits in one step, so a half-applied
//! update (ticket without reservation, or the reverse) is never visible.

use crate::inventory;
use crate::model::{Asset, AssetCategory, AssetStatus, MaintenanceRecord, WorkOrderPriority, WorkOrderStatus};
use crate::notifications::NotificationDraft;
use chrono::{DateTime, NaiveDate, Utc};

/// Health below which a ticket is opened.
pub const DEFAULT_HEALTH_THRESHOLD: f64 = 40.0;

/// Title prefix of automatically opened tickets.
pub const AUTO_TITLE_PREFIX: &str = "AUTO-WO";

/// The spare part automation reserves for each category.
pub fn critical_part_for(category: AssetCategory) -> &'static str {
    match category {
        AssetCategory::Vessel => "Main Engine Fuel Filter",
        AssetCategory::OffshoreRig => "BOP Seal Kit",
        AssetCategory::OnshoreRig => "Hydraulic Valve Set",
    }
}

/// True if the asset already carries an automatic ticket dated `day`.
pub fn has_auto_ticket_on(asset: &Asset, day: NaiveDate) -> bool {
    asset
        .maintenance_log
        .iter()
        .any(|r| r.auto_generated && r.date == day)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    HealthAboveThreshold,
    AlreadyInactive,
    AlreadyTicketedToday,
}

/// An automatic ticket, with the asset as it must be committed.
#[derive(Debug, Clone)]
pub struct AutomationTicket {
    pub asset: Asset,
    pub ticket_id: String,
    pub priority: WorkOrderPriority,
    pub part_reserved: bool,
    pub notifications: Vec<NotificationDraft>,
}

#[derive(Debug, Clone)]
pub enum AutomationOutcome {
    Skipped(SkipReason),
    Opened(Box<AutomationTicket>),
}

/// Evaluates one asset against the automation rules.
pub fn run_automation(asset: &Asset, threshold: f64, now: DateTime<Utc>) -> AutomationOutcome {
    let today = now.date_naive();

    if asset.health >= threshold {
        return AutomationOutcome::Skipped(SkipReason::HealthAboveThreshold);
    }
    if asset.status == AssetStatus::Inactive {
        return AutomationOutcome::Skipped(SkipReason::AlreadyInactive);
    }
    if has_auto_ticket_on(asset, today) {
        return AutomationOutcome::Skipped(SkipReason::AlreadyTicketedToday);
    }

    let mut next = asset.clone();
    let mut notifications = Vec::with_capacity(2);
    let part_name = critical_part_for(asset.category);

    let reservation = inventory::find_by_name_mut(&mut next, part_name)
        .and_then(|part| inventory::take_one(part, now).then(|| (part.sku.clone(), part.quantity)));

    let (priority, note) = match &reservation {
        Some((sku, remaining)) => {
            notifications.push(NotificationDraft::info(
                &asset.id,
                "Part Reserved",
                format!("1 x {} ({}) reserved for {}, {} left on board", part_name, sku, asset.number, remaining),
            ));
            (
                WorkOrderPriority::High,
                format!("Reserved 1 x {} ({}) from onboard inventory, {} remaining.", part_name, sku, remaining),
            )
        }
        None => {
            notifications.push(NotificationDraft::critical(
                &asset.id,
                "Stockout",
                format!("{} has no {} in stock. Procurement request triggered.", asset.number, part_name),
            ));
            (
                WorkOrderPriority::Critical,
                format!("STOCKOUT: {} unavailable in onboard inventory. Procurement request triggered.", part_name),
            )
        }
    };

    let ticket_id = format!("WO-AUTO-{}-{}", asset.id, today.format("%Y%m%d"));
    let record = MaintenanceRecord {
        id: ticket_id.clone(),
        title: format!("{}: {} health at {:.1}%", AUTO_TITLE_PREFIX, asset.number, asset.health),
        date: today,
        kind: "Corrective".to_string(),
        description: format!(
            "Health dropped to {:.2}% (threshold {:.0}%). {}",
            asset.health, threshold, note
        ),
        status: WorkOrderStatus::Open,
        priority,
        auto_generated: true,
    };

    next.maintenance_log.insert(0, record);
    next.status = AssetStatus::Inactive;
    next.next_maintenance_date = Some(today);

    notifications.push(NotificationDraft::warning(
        &asset.id,
        "Work Order Created",
        format!("{} opened for {} ({} priority), asset set to Inactive", ticket_id, asset.number, priority),
    ));

    AutomationOutcome::Opened(Box::new(AutomationTicket {
        asset: next,
        ticket_id,
        priority,
        part_reserved: reservation.is_some(),
        notifications,
    }))
}

/// A ticket moved one step along its status path.
#[derive(Debug, Clone)]
pub struct TicketAdvance {
    pub asset: Asset,
    pub from: WorkOrderStatus,
    pub to: WorkOrderStatus,
    /// The asset came back from automation downtime
    pub restored: bool,
}

/// Advances a ticket of `asset` by one status. Completed tickets stay
/// completed. Returns `None` if the ticket does not belong to the asset.
pub fn advance_ticket(asset: &Asset, ticket_id: &str) -> Option<TicketAdvance> {
    let mut next = asset.clone();
    let record = next.maintenance_log.iter_mut().find(|r| r.id == ticket_id)?;

    let from = record.status;
    let to = from.next().unwrap_or(from);
    record.status = to;

    let restored = from != to && to == WorkOrderStatus::Completed && next.status == AssetStatus::Inactive;
    if restored {
        next.status = AssetStatus::Active;
        next.health = 100.0;
    }

    Some(TicketAdvance {
        asset: next,
        from,
        to,
        restored,
    })
}
