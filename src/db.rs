use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;
use derive_more::{Display, Error, From};
use tracing::{debug, info};

use crate::clipboard::{Clipboard, WeekOffset};
use crate::model::attendance::{AttendanceRecord, CustomerId};
use crate::model::interval::{Interval, IntervalError};
use crate::model::slot::{Slot, SlotError, SlotId, SlotIdGenerator, SlotMap, SlotParams, UuidSlotIds};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum StoreError {
    #[display(fmt = "slot {} not found", slot)]
    SlotNotFound { slot: SlotId },
    #[display(fmt = "customer {} has no booking on slot {}", customer, slot)]
    BookingNotFound { slot: SlotId, customer: CustomerId },
    #[display(fmt = "slot {} does not offer interval {}", slot, interval)]
    IntervalNotOffered { slot: SlotId, interval: String },
    #[display(fmt = "{}", _0)]
    #[from]
    InvalidSlot(#[error(source)] SlotError),
    #[display(fmt = "{}", _0)]
    #[from]
    InvalidInterval(#[error(source)] IntervalError),
}

/// All documents of one organization.
///
/// Slots are filed by day (the `slotsByDay` view) with an id index pointing
/// at each slot's bucket. Attendance records hang off the slot they belong
/// to and go away with it.
#[derive(Debug, Default)]
pub struct Organization {
    slots_by_day: BTreeMap<NaiveDate, SlotMap>,
    slot_dates: HashMap<SlotId, NaiveDate>,
    attendance: HashMap<SlotId, BTreeMap<CustomerId, AttendanceRecord>>,
    clipboard: Clipboard,
}

impl Organization {
    fn file(&mut self, slot: Slot) {
        self.slot_dates.insert(slot.id.clone(), slot.date());
        self.slots_by_day
            .entry(slot.date())
            .or_default()
            .insert(slot.id.clone(), slot);
    }

    fn unfile(&mut self, id: &SlotId) -> Option<Slot> {
        let date = self.slot_dates.remove(id)?;
        let day = self.slots_by_day.get_mut(&date)?;
        let slot = day.remove(id);
        if day.is_empty() {
            self.slots_by_day.remove(&date);
        }
        slot
    }

    fn has_slots(&self) -> bool {
        !self.slot_dates.is_empty()
    }

    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        let date = self.slot_dates.get(id)?;
        self.slots_by_day.get(date)?.get(id)
    }

    pub fn create_slot<G>(&mut self, params: SlotParams, ids: &mut G) -> Result<Slot, StoreError>
    where
        G: SlotIdGenerator + ?Sized,
    {
        params.validate()?;
        let slot = Slot::new(ids.next_id(), params);
        debug!(slot = %slot.id, date = %slot.date(), "Slot created");
        self.file(slot.clone());
        Ok(slot)
    }

    /// Replaces a slot's params in place, keeping its id. Bookings survive
    /// only on intervals the slot still offers.
    pub fn update_slot(&mut self, id: &SlotId, params: SlotParams) -> Result<Slot, StoreError> {
        params.validate()?;
        self.unfile(id).ok_or_else(|| StoreError::SlotNotFound { slot: id.clone() })?;
        let slot = Slot::new(id.clone(), params);
        if let Some(bookings) = self.attendance.get_mut(id) {
            bookings.retain(|_, record| slot.interval(&record.booked_interval.key()).is_some());
        }
        self.file(slot.clone());
        self.clipboard.update_slot(&slot);
        debug!(slot = %slot.id, date = %slot.date(), "Slot updated");
        Ok(slot)
    }

    pub fn delete_slot(&mut self, id: &SlotId) -> Result<Slot, StoreError> {
        let slot = self
            .unfile(id)
            .ok_or_else(|| StoreError::SlotNotFound { slot: id.clone() })?;
        self.forget(id);
        debug!(slot = %id, "Slot deleted");
        Ok(slot)
    }

    /// Drops everything hanging off an unfiled slot.
    fn forget(&mut self, id: &SlotId) {
        self.attendance.remove(id);
        self.clipboard.remove_slot(id);
    }

    /// A day's slots ordered by their earliest interval.
    pub fn slots_for_day(&self, date: NaiveDate) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self
            .slots_by_day
            .get(&date)
            .map(|day| day.values().cloned().collect())
            .unwrap_or_default();
        slots.sort_by(|a, b| a.start_time().cmp(&b.start_time()).then_with(|| a.id.cmp(&b.id)));
        slots
    }

    /// Seven entries, one per weekday offset from `start`, empty days included.
    pub fn slots_for_week(&self, start: NaiveDate) -> Vec<(WeekOffset, Vec<Slot>)> {
        WeekOffset::all()
            .map(|offset| (offset, self.slots_for_day(offset.date_from(start))))
            .collect()
    }

    pub fn delete_slots_for_day(&mut self, date: NaiveDate) -> Vec<SlotId> {
        let Some(day) = self.slots_by_day.remove(&date) else {
            return Vec::new();
        };
        let ids: Vec<SlotId> = day.into_keys().collect();
        for id in &ids {
            self.slot_dates.remove(id);
            self.forget(id);
        }
        debug!(%date, count = ids.len(), "Day slots deleted");
        ids
    }

    pub fn delete_slots_for_week(&mut self, start: NaiveDate) -> Vec<SlotId> {
        WeekOffset::all()
            .flat_map(|offset| self.delete_slots_for_day(offset.date_from(start)))
            .collect()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard.clear();
    }

    /// Loads the clipboard with a stored day. Returns how many slots were copied.
    pub fn copy_day(&mut self, date: NaiveDate) -> usize {
        let slots = self.slots_for_day(date);
        let copied = slots.len();
        self.clipboard.copy_day(date, slots);
        copied
    }

    pub fn copy_week(&mut self, start: NaiveDate) -> usize {
        let week = self.slots_for_week(start);
        let copied = week.iter().map(|(_, slots)| slots.len()).sum();
        self.clipboard.copy_week(start, week);
        copied
    }

    /// Pastes the copied day onto `target` and files the new slots next to
    /// whatever is already there.
    pub fn paste_day<G>(&mut self, target: NaiveDate, ids: &mut G) -> Vec<Slot>
    where
        G: SlotIdGenerator + ?Sized,
    {
        let pasted: Vec<Slot> = self.clipboard.paste_day(target, ids).into_values().collect();
        for slot in &pasted {
            self.file(slot.clone());
        }
        pasted
    }

    pub fn paste_week<G>(&mut self, target_start: NaiveDate, ids: &mut G) -> Vec<Slot>
    where
        G: SlotIdGenerator + ?Sized,
    {
        let pasted: Vec<Slot> = self
            .clipboard
            .paste_week(target_start, ids)
            .into_values()
            .flat_map(SlotMap::into_values)
            .collect();
        for slot in &pasted {
            self.file(slot.clone());
        }
        pasted
    }

    /// Books `customer` onto one of the slot's intervals. Booking again
    /// replaces the previous interval and resets attendance.
    pub fn book(
        &mut self,
        slot_id: &SlotId,
        customer: CustomerId,
        interval_key: &str,
    ) -> Result<AttendanceRecord, StoreError> {
        let slot = self
            .slot(slot_id)
            .ok_or_else(|| StoreError::SlotNotFound { slot: slot_id.clone() })?;
        let interval: Interval = interval_key.parse()?;
        if slot.interval(&interval.key()).is_none() {
            return Err(StoreError::IntervalNotOffered {
                slot: slot_id.clone(),
                interval: interval.key(),
            });
        }
        let record = AttendanceRecord::booked(interval);
        debug!(slot = %slot_id, customer = %customer, interval = %interval, "Booking stored");
        self.attendance
            .entry(slot_id.clone())
            .or_default()
            .insert(customer, record);
        Ok(record)
    }

    pub fn cancel_booking(
        &mut self,
        slot_id: &SlotId,
        customer: &CustomerId,
    ) -> Result<AttendanceRecord, StoreError> {
        let bookings = self.attendance.get_mut(slot_id);
        let record = bookings
            .and_then(|bookings| bookings.remove(customer))
            .ok_or_else(|| self.missing_booking(slot_id, customer))?;
        debug!(slot = %slot_id, customer = %customer, "Booking cancelled");
        Ok(record)
    }

    /// Records what the customer actually attended; `None` resets to pending.
    pub fn mark_attendance(
        &mut self,
        slot_id: &SlotId,
        customer: &CustomerId,
        attended: Option<Interval>,
    ) -> Result<AttendanceRecord, StoreError> {
        let record = self
            .attendance
            .get_mut(slot_id)
            .and_then(|bookings| bookings.get_mut(customer));
        let Some(record) = record else {
            return Err(self.missing_booking(slot_id, customer));
        };
        record.attended_interval = attended;
        let record = *record;
        debug!(slot = %slot_id, customer = %customer, ?attended, "Attendance marked");
        Ok(record)
    }

    pub fn attendance_for_slot(
        &self,
        slot_id: &SlotId,
    ) -> Result<Vec<(CustomerId, AttendanceRecord)>, StoreError> {
        if self.slot(slot_id).is_none() {
            return Err(StoreError::SlotNotFound { slot: slot_id.clone() });
        }
        Ok(self
            .attendance
            .get(slot_id)
            .map(|bookings| {
                bookings
                    .iter()
                    .map(|(customer, record)| (customer.clone(), *record))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn missing_booking(&self, slot_id: &SlotId, customer: &CustomerId) -> StoreError {
        if self.slot(slot_id).is_none() {
            StoreError::SlotNotFound { slot: slot_id.clone() }
        } else {
            StoreError::BookingNotFound {
                slot: slot_id.clone(),
                customer: customer.clone(),
            }
        }
    }
}

struct Inner {
    organizations: HashMap<String, Organization>,
    ids: Box<dyn SlotIdGenerator + Send + Sync>,
}

/// In-memory documents for every organization, shared across workers.
pub struct Database {
    inner: RwLock<Inner>,
}

impl Database {
    pub fn new() -> Self {
        Self::with_id_generator(UuidSlotIds)
    }

    pub fn with_id_generator<G>(ids: G) -> Self
    where
        G: SlotIdGenerator + Send + Sync + 'static,
    {
        Self {
            inner: RwLock::new(Inner {
                organizations: HashMap::new(),
                ids: Box::new(ids),
            }),
        }
    }

    /// Runs `f` against an organization's documents.
    ///
    /// An unknown organization starts out empty and is only kept once `f`
    /// has filed a slot for it.
    pub fn write<R>(
        &self,
        organization: &str,
        f: impl FnOnce(&mut Organization, &mut dyn SlotIdGenerator) -> R,
    ) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let inner = &mut *guard;
        if let Some(documents) = inner.organizations.get_mut(organization) {
            return f(documents, inner.ids.as_mut());
        }
        let mut documents = Organization::default();
        let result = f(&mut documents, inner.ids.as_mut());
        if documents.has_slots() {
            info!(organization, "Organization documents created");
            inner
                .organizations
                .insert(organization.to_string(), documents);
        }
        result
    }

    /// Read-only view; unknown organizations look empty.
    pub fn read<R>(&self, organization: &str, f: impl FnOnce(&Organization) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match guard.organizations.get(organization) {
            Some(documents) => f(documents),
            None => f(&Organization::default()),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_db() -> Database {
    info!("In-memory document store ready");
    Database::new()
}
