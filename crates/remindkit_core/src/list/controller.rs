//! Reminder list controller.
//!
//! # Responsibility
//! - Build store queries from the list filters.
//! - Guard section publishing with a monotonically increasing ticket.
//! - Notify explicit subscribers when the published sections change.
//!
//! # Invariants
//! - Only the result of the most recently issued ticket is sectioned.
//! - Sections are replaced wholesale and only published when they differ
//!   from the previous publish (the first completion always publishes).
//! - Subscribers are called synchronously, in registration order.
//! - Each ticket settles once; a second complete or abandon is ignored.

use crate::calendar::LocalCalendar;
use crate::list::sectioner::{section, section_header, DayBucket};
use crate::list::store::{ReminderQuery, ReminderStore, StoreError, StoreResult, TimeWindow};
use crate::model::reminder::{Reminder, ReminderId};
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};
use std::collections::BTreeSet;

/// Default look-ahead for the "scheduled" view.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 10_000;

/// List filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub show_completed: bool,
    pub show_undated: bool,
    pub lookahead_days: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            show_completed: false,
            show_undated: false,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

/// Identifies one refresh round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Queries to run for one ticket. Results are concatenated in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub ticket: RefreshTicket,
    pub queries: Vec<ReminderQuery>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A newer ticket was issued; the result was dropped.
    Stale,
    /// Same sections as the last publish; subscribers were not called.
    Unchanged,
    Published { buckets: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&[DayBucket])>;

/// Owns the published day buckets for one list screen.
pub struct ReminderListController {
    options: ListOptions,
    latest_ticket: u64,
    outstanding: BTreeSet<u64>,
    published: Option<Vec<DayBucket>>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for ReminderListController {
    fn default() -> Self {
        Self::new(ListOptions::default())
    }
}

impl ReminderListController {
    pub fn new(options: ListOptions) -> Self {
        Self {
            options,
            latest_ticket: 0,
            outstanding: BTreeSet::new(),
            published: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn options(&self) -> ListOptions {
        self.options
    }

    /// Takes effect on the next refresh.
    pub fn set_show_completed(&mut self, show: bool) {
        self.options.show_completed = show;
    }

    /// Takes effect on the next refresh.
    pub fn set_show_undated(&mut self, show: bool) {
        self.options.show_undated = show;
    }

    /// Last published buckets; empty before the first publish.
    pub fn buckets(&self) -> &[DayBucket] {
        self.published.as_deref().unwrap_or(&[])
    }

    pub fn header<C: LocalCalendar + ?Sized>(&self, index: usize, calendar: &C) -> Option<String> {
        section_header(self.buckets(), index, calendar)
    }

    /// Whether any issued ticket has not completed or been abandoned yet.
    pub fn is_loading(&self) -> bool {
        !self.outstanding.is_empty()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&[DayBucket]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn begin_refresh<C: LocalCalendar + ?Sized>(&mut self, calendar: &C) -> RefreshRequest {
        self.latest_ticket += 1;
        self.outstanding.insert(self.latest_ticket);
        let ticket = RefreshTicket(self.latest_ticket);
        let queries = self.build_queries(calendar);
        debug!(
            "event=list_refresh module=list status=start ticket={} queries={}",
            ticket.0,
            queries.len()
        );
        RefreshRequest { ticket, queries }
    }

    /// Releases a ticket whose fetch failed or was cancelled.
    ///
    /// Returns `false` when the ticket had already settled.
    pub fn abandon_refresh(&mut self, ticket: RefreshTicket) -> bool {
        if !self.outstanding.remove(&ticket.0) {
            return false;
        }
        debug!(
            "event=list_refresh module=list status=abandoned ticket={}",
            ticket.0
        );
        true
    }

    /// Sections `fetched` if `ticket` is still current and publishes changes.
    ///
    /// A ticket that already settled is reported as [`RefreshOutcome::Stale`].
    pub fn complete_refresh<C: LocalCalendar + ?Sized>(
        &mut self,
        ticket: RefreshTicket,
        fetched: Vec<Reminder>,
        calendar: &C,
    ) -> RefreshOutcome {
        let settles_now = self.outstanding.remove(&ticket.0);
        if !settles_now || ticket.0 != self.latest_ticket {
            debug!(
                "event=list_refresh module=list status=stale ticket={} latest={}",
                ticket.0, self.latest_ticket
            );
            return RefreshOutcome::Stale;
        }

        let fetched_count = fetched.len();
        let buckets = section(fetched, calendar);
        if self.published.as_ref() == Some(&buckets) {
            debug!(
                "event=list_refresh module=list status=unchanged ticket={}",
                ticket.0
            );
            return RefreshOutcome::Unchanged;
        }

        let count = buckets.len();
        let published: &[DayBucket] = self.published.insert(buckets);
        for (_, subscriber) in &mut self.subscribers {
            subscriber(published);
        }
        info!(
            "event=list_refresh module=list status=ok ticket={} reminders={} buckets={}",
            ticket.0, fetched_count, count
        );
        RefreshOutcome::Published { buckets: count }
    }

    /// Synchronous fetch + complete round trip.
    ///
    /// # Errors
    /// Returns the first store failure; the ticket is abandoned.
    pub fn refresh<S, C>(&mut self, store: &S, calendar: &C) -> StoreResult<RefreshOutcome>
    where
        S: ReminderStore + ?Sized,
        C: LocalCalendar + ?Sized,
    {
        let request = self.begin_refresh(calendar);
        let mut fetched = Vec::new();
        for query in &request.queries {
            match store.fetch_reminders(query) {
                Ok(batch) => fetched.extend(batch),
                Err(err) => {
                    error!(
                        "event=list_refresh module=list status=error ticket={} error={}",
                        request.ticket.0, err
                    );
                    self.abandon_refresh(request.ticket);
                    return Err(err);
                }
            }
        }
        Ok(self.complete_refresh(request.ticket, fetched, calendar))
    }

    /// Entry point for store-change notifications.
    ///
    /// # Errors
    /// Same as [`Self::refresh`].
    pub fn store_changed<S, C>(&mut self, store: &S, calendar: &C) -> StoreResult<RefreshOutcome>
    where
        S: ReminderStore + ?Sized,
        C: LocalCalendar + ?Sized,
    {
        debug!("event=store_changed module=list status=received");
        self.refresh(store, calendar)
    }

    /// Flips completion of `id`, saves it and refreshes.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when the store has no such reminder.
    /// - Any save or fetch failure from the store.
    pub fn toggle_completion<S, C>(
        &mut self,
        store: &mut S,
        id: ReminderId,
        calendar: &C,
    ) -> StoreResult<RefreshOutcome>
    where
        S: ReminderStore + ?Sized,
        C: LocalCalendar + ?Sized,
    {
        let mut reminder = store.get_reminder(id)?.ok_or(StoreError::NotFound(id))?;
        let completed = !reminder.completed;
        reminder.set_completed(completed, calendar.now());
        store.save_reminder(&reminder)?;
        info!(
            "event=toggle_completion module=list status=ok id={} completed={}",
            id, completed
        );
        self.refresh(&*store, calendar)
    }

    fn build_queries<C: LocalCalendar + ?Sized>(&self, calendar: &C) -> Vec<ReminderQuery> {
        let window = self.scheduled_window(calendar);
        let bounded = (!self.options.show_undated).then_some(window);

        let mut queries = vec![ReminderQuery::Incomplete {
            due_before: bounded.map(|w| w.end),
        }];
        if self.options.show_completed {
            queries.push(ReminderQuery::Completed { window: bounded });
        }
        queries
    }

    /// Start of today through the last second of the look-ahead day.
    fn scheduled_window<C: LocalCalendar + ?Sized>(&self, calendar: &C) -> TimeWindow {
        let now = calendar.now();
        let start = calendar.start_of_day(calendar.today()).unwrap_or(now);
        let span = Duration::days(i64::from(self.options.lookahead_days))
            + Duration::hours(23)
            + Duration::minutes(59)
            + Duration::seconds(59);
        let end = start
            .checked_add_signed(span)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        TimeWindow { start, end }
    }
}
