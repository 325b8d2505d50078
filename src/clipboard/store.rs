use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use derive_more::Display;
use serde::Serialize;

use crate::clipboard::paste::{resolve_day, resolve_week};
use crate::model::slot::{Slot, SlotId, SlotIdGenerator, SlotMap};

/// Day position inside a copied week, `0` being the week's first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
#[serde(transparent)]
pub struct WeekOffset(u8);

impl WeekOffset {
    pub const DAYS: u8 = 7;

    pub fn new(offset: u8) -> Option<Self> {
        (offset < Self::DAYS).then_some(WeekOffset(offset))
    }

    pub fn all() -> impl Iterator<Item = WeekOffset> {
        (0..Self::DAYS).filter_map(WeekOffset::new)
    }

    pub fn date_from(self, start: NaiveDate) -> NaiveDate {
        start + Days::new(u64::from(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopiedDay {
    pub date: NaiveDate,
    pub slots: SlotMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopiedWeek {
    pub start_date: NaiveDate,
    pub days: BTreeMap<WeekOffset, CopiedDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ClipboardEntry {
    Day(CopiedDay),
    Week(CopiedWeek),
}

impl ClipboardEntry {
    fn slots_mut(&mut self) -> Box<dyn Iterator<Item = &mut SlotMap> + '_> {
        match self {
            ClipboardEntry::Day(day) => Box::new(std::iter::once(&mut day.slots)),
            ClipboardEntry::Week(week) => Box::new(week.days.values_mut().map(|day| &mut day.slots)),
        }
    }
}

/// Holds at most one copied day or one copied week.
///
/// A single `Option` of the entry makes the two shapes mutually exclusive:
/// copying either one replaces whatever was held before.
#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    entry: Option<ClipboardEntry>,
}

impl Clipboard {
    pub fn entry(&self) -> Option<&ClipboardEntry> {
        self.entry.as_ref()
    }

    pub fn copied_day(&self) -> Option<&CopiedDay> {
        match &self.entry {
            Some(ClipboardEntry::Day(day)) => Some(day),
            _ => None,
        }
    }

    pub fn copied_week(&self) -> Option<&CopiedWeek> {
        match &self.entry {
            Some(ClipboardEntry::Week(week)) => Some(week),
            _ => None,
        }
    }

    pub fn copy_day<I>(&mut self, date: NaiveDate, slots: I)
    where
        I: IntoIterator<Item = Slot>,
    {
        let slots = slots
            .into_iter()
            .map(|slot| (slot.id.clone(), slot))
            .collect();
        self.entry = Some(ClipboardEntry::Day(CopiedDay { date, slots }));
    }

    /// Copies a week; every offset gets a day entry, empty or not.
    pub fn copy_week<I>(&mut self, start_date: NaiveDate, slots_by_day: I)
    where
        I: IntoIterator<Item = (WeekOffset, Vec<Slot>)>,
    {
        let mut days: BTreeMap<WeekOffset, CopiedDay> = WeekOffset::all()
            .map(|offset| {
                let day = CopiedDay {
                    date: offset.date_from(start_date),
                    slots: SlotMap::new(),
                };
                (offset, day)
            })
            .collect();
        for (offset, slots) in slots_by_day {
            if let Some(day) = days.get_mut(&offset) {
                day.slots
                    .extend(slots.into_iter().map(|slot| (slot.id.clone(), slot)));
            }
        }
        self.entry = Some(ClipboardEntry::Week(CopiedWeek { start_date, days }));
    }

    /// Slots the copied day would produce on `target`; empty unless a day is held.
    pub fn paste_day<G>(&self, target: NaiveDate, ids: &mut G) -> SlotMap
    where
        G: SlotIdGenerator + ?Sized,
    {
        match self.copied_day() {
            Some(day) => resolve_day(&day.slots, target, ids),
            None => SlotMap::new(),
        }
    }

    /// Slots the copied week would produce from `target_start`, grouped by date;
    /// empty unless a week is held.
    pub fn paste_week<G>(&self, target_start: NaiveDate, ids: &mut G) -> BTreeMap<NaiveDate, SlotMap>
    where
        G: SlotIdGenerator + ?Sized,
    {
        match self.copied_week() {
            Some(week) => resolve_week(&week.days, target_start, ids),
            None => BTreeMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Drops a deleted slot from the held entry. Returns whether it was held.
    pub fn remove_slot(&mut self, id: &SlotId) -> bool {
        let Some(entry) = self.entry.as_mut() else {
            return false;
        };
        let mut removed = false;
        for slots in entry.slots_mut() {
            removed |= slots.remove(id).is_some();
        }
        removed
    }

    /// Refreshes the held copy of an edited slot. Returns whether it was held.
    pub fn update_slot(&mut self, slot: &Slot) -> bool {
        let Some(entry) = self.entry.as_mut() else {
            return false;
        };
        let mut updated = false;
        for slots in entry.slots_mut() {
            if let Some(held) = slots.get_mut(&slot.id) {
                *held = slot.clone();
                updated = true;
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::slot::test_support::{SequentialIds, date, slot};

    fn offset(value: u8) -> WeekOffset {
        WeekOffset::new(value).unwrap()
    }

    #[test]
    fn offsets_stay_within_a_week() {
        assert!(WeekOffset::new(6).is_some());
        assert!(WeekOffset::new(7).is_none());
        assert_eq!(WeekOffset::all().count(), usize::from(WeekOffset::DAYS));
        let start = date("2021-08-09");
        assert_eq!(offset(2).date_from(start), date("2021-08-11"));
        assert_eq!(
            WeekOffset::all().last().unwrap().date_from(start),
            date("2021-08-15")
        );
    }

    #[test]
    fn copy_then_paste_day_scenario() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_day(
            date("2021-08-11"),
            [slot("s1", "2021-08-11", &["09:00-10:00"])],
        );

        let pasted = clipboard.paste_day(date("2021-08-18"), &mut SequentialIds::new("new"));

        assert_eq!(pasted.len(), 1);
        let pasted = pasted.values().next().unwrap();
        assert_eq!(pasted.date(), date("2021-08-18"));
        assert_ne!(pasted.id, SlotId::from("s1"));
        assert_eq!(
            pasted.params.intervals.keys().collect::<Vec<_>>(),
            vec!["09:00-10:00"]
        );
    }

    #[test]
    fn copy_week_clears_day_and_back() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_day(date("2021-08-11"), [slot("s1", "2021-08-11", &["09:00-10:00"])]);
        assert!(clipboard.copied_day().is_some());

        clipboard.copy_week(date("2021-08-09"), Vec::new());
        assert!(clipboard.copied_day().is_none());
        assert!(clipboard.copied_week().is_some());

        clipboard.copy_day(date("2021-08-11"), Vec::new());
        assert!(clipboard.copied_week().is_none());
        assert!(clipboard.copied_day().is_some());
    }

    #[test]
    fn copy_day_overwrites_previous_day() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_day(date("2021-08-11"), [slot("s1", "2021-08-11", &["09:00-10:00"])]);
        clipboard.copy_day(date("2021-08-12"), [slot("s2", "2021-08-12", &["11:00-12:00"])]);

        let day = clipboard.copied_day().unwrap();
        assert_eq!(day.date, date("2021-08-12"));
        assert!(day.slots.contains_key(&SlotId::from("s2")));
        assert!(!day.slots.contains_key(&SlotId::from("s1")));
    }

    #[test]
    fn paste_with_wrong_shape_is_empty() {
        let mut ids = SequentialIds::new("x");
        let mut clipboard = Clipboard::default();
        assert!(clipboard.paste_day(date("2021-08-18"), &mut ids).is_empty());
        assert!(clipboard.paste_week(date("2021-08-16"), &mut ids).is_empty());

        clipboard.copy_day(date("2021-08-11"), [slot("s1", "2021-08-11", &["09:00-10:00"])]);
        assert!(clipboard.paste_week(date("2021-08-16"), &mut ids).is_empty());

        clipboard.copy_week(date("2021-08-09"), [(offset(0), vec![slot("s1", "2021-08-09", &["09:00-10:00"])])]);
        assert!(clipboard.paste_day(date("2021-08-18"), &mut ids).is_empty());
    }

    #[test]
    fn week_paste_keeps_offsets() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_week(
            date("2021-08-09"),
            [
                (offset(1), vec![slot("tue", "2021-08-10", &["09:00-10:00"])]),
                (
                    offset(5),
                    vec![
                        slot("sat-a", "2021-08-14", &["08:00-09:00"]),
                        slot("sat-b", "2021-08-14", &["09:00-10:00"]),
                    ],
                ),
            ],
        );
        assert_eq!(clipboard.copied_week().unwrap().days.len(), 7);

        let target = date("2021-08-23");
        let pasted = clipboard.paste_week(target, &mut SequentialIds::new("w"));

        let populated: Vec<(NaiveDate, usize)> = pasted
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(day, slots)| (*day, slots.len()))
            .collect();
        assert_eq!(
            populated,
            vec![(date("2021-08-24"), 1), (date("2021-08-28"), 2)]
        );
        for (day, slots) in &pasted {
            assert!(slots.values().all(|slot| slot.date() == *day));
        }
    }

    #[test]
    fn clear_empties_both_shapes() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_week(date("2021-08-09"), Vec::new());
        clipboard.clear();
        assert!(clipboard.entry().is_none());
    }

    #[test]
    fn removed_slot_is_not_pasted() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_week(
            date("2021-08-09"),
            [(offset(2), vec![slot("s1", "2021-08-11", &["09:00-10:00"]), slot("s2", "2021-08-11", &["10:00-11:00"])])],
        );

        assert!(clipboard.remove_slot(&SlotId::from("s1")));
        assert!(!clipboard.remove_slot(&SlotId::from("s1")));

        let pasted = clipboard.paste_week(date("2021-08-16"), &mut SequentialIds::new("w"));
        let total: usize = pasted.values().map(SlotMap::len).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn updated_slot_is_pasted_with_new_notes() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_day(date("2021-08-11"), [slot("s1", "2021-08-11", &["09:00-10:00"])]);

        let mut edited = slot("s1", "2021-08-11", &["09:00-10:00"]);
        edited.params.notes = "moved to rink B".into();
        assert!(clipboard.update_slot(&edited));
        assert!(!clipboard.update_slot(&slot("other", "2021-08-11", &["09:00-10:00"])));

        let pasted = clipboard.paste_day(date("2021-08-12"), &mut SequentialIds::new("p"));
        assert_eq!(pasted.values().next().unwrap().params.notes, "moved to rink B");
    }

    #[test]
    fn entry_serializes_with_kind_tag() {
        let mut clipboard = Clipboard::default();
        clipboard.copy_day(date("2021-08-11"), Vec::new());
        let json = serde_json::to_value(clipboard.entry()).unwrap();
        assert_eq!(json["kind"], "day");
        assert_eq!(json["date"], "2021-08-11");
    }
}
