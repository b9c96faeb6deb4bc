//! Admin statistics over the orders in a date range
//!
//! Counts (`total_orders`, per type, per status) cover every order created in
//! the range; money, pieces, prep time and the breakdowns cover completed
//! orders only.

use super::range::DateRange;
use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use serde::Serialize;
use shared::order::{Order, OrderStatus, OrderType};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuStat {
    pub count: u64,
    pub revenue: i64,
    /// Share of total revenue, 0-100
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdditionalStat {
    pub count: u64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    #[serde(rename = "dine-in")]
    pub dine_in: usize,
    pub takeaway: usize,
    pub delivery: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HourlyStat {
    pub hour: u32,
    pub orders: usize,
    pub revenue: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyStat {
    /// Local date, `YYYY-MM-DD`
    pub date: String,
    pub orders: usize,
    pub revenue: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsData {
    pub total_orders: usize,
    pub completed_orders: usize,
    pub total_revenue: i64,
    pub total_pieces: u64,
    /// Minutes from start to completion, averaged over orders with both stamps
    pub avg_prep_time: f64,
    pub avg_order_value: f64,
    /// Keyed by menu name
    pub menu_stats: BTreeMap<String, MenuStat>,
    /// Keyed by add-on name
    pub additional_stats: BTreeMap<String, AdditionalStat>,
    pub orders_by_type: TypeCounts,
    pub orders_by_status: StatusCounts,
    /// Always 24 entries, hour 0-23 local time
    pub hourly_stats: Vec<HourlyStat>,
    /// One entry per local day with completed orders, oldest first
    pub daily_stats: Vec<DailyStat>,
}

fn local_time(tz: Tz, millis: i64) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz))
}

impl StatsData {
    pub fn compute(orders: &[Order], range: &DateRange, tz: Tz) -> Self {
        let in_range: Vec<&Order> = orders.iter().filter(|o| range.contains(o.created_at)).collect();
        let completed: Vec<&Order> = in_range
            .iter()
            .copied()
            .filter(|o| o.status == OrderStatus::Completed)
            .collect();

        let mut stats = StatsData {
            total_orders: in_range.len(),
            completed_orders: completed.len(),
            hourly_stats: (0..24).map(|hour| HourlyStat { hour, ..Default::default() }).collect(),
            ..Default::default()
        };

        for order in &in_range {
            match order.order_type {
                OrderType::DineIn => stats.orders_by_type.dine_in += 1,
                OrderType::Takeaway => stats.orders_by_type.takeaway += 1,
                OrderType::Delivery => stats.orders_by_type.delivery += 1,
            }
            match order.status {
                OrderStatus::Pending => stats.orders_by_status.pending += 1,
                OrderStatus::Preparing => stats.orders_by_status.preparing += 1,
                OrderStatus::Ready => stats.orders_by_status.ready += 1,
                OrderStatus::Completed => stats.orders_by_status.completed += 1,
            }
        }

        let mut daily: BTreeMap<String, DailyStat> = BTreeMap::new();
        let mut prep_minutes = Vec::new();

        for order in &completed {
            stats.total_revenue += order.total_price;
            stats.total_pieces += u64::from(order.total_pieces);
            prep_minutes.extend(order.prep_minutes());

            for item in &order.items {
                let entry = stats.menu_stats.entry(item.menu_name.clone()).or_default();
                entry.count += u64::from(item.quantity);
                entry.revenue += item.subtotal;
            }
            for additional in &order.additionals {
                let entry = stats.additional_stats.entry(additional.name.clone()).or_default();
                entry.count += u64::from(additional.quantity);
                entry.revenue += additional.subtotal;
            }

            if let Some(local) = local_time(tz, order.created_at) {
                let hourly = &mut stats.hourly_stats[local.hour() as usize];
                hourly.orders += 1;
                hourly.revenue += order.total_price;

                let date = local.format("%Y-%m-%d").to_string();
                let day = daily.entry(date.clone()).or_insert_with(|| DailyStat {
                    date,
                    ..Default::default()
                });
                day.orders += 1;
                day.revenue += order.total_price;
            }
        }

        if !prep_minutes.is_empty() {
            stats.avg_prep_time = prep_minutes.iter().sum::<f64>() / prep_minutes.len() as f64;
        }
        if !completed.is_empty() {
            stats.avg_order_value = stats.total_revenue as f64 / completed.len() as f64;
        }
        if stats.total_revenue > 0 {
            for menu in stats.menu_stats.values_mut() {
                menu.percentage = menu.revenue as f64 / stats.total_revenue as f64 * 100.0;
            }
        }
        stats.daily_stats = daily.into_values().collect();
        stats
    }
}
